use plyfmt::ply::{PlyError, Result, parse_addr};

/// Which values of an image to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RootSelector {
	/// Every named root in file order.
	All,
	/// One named root.
	Named(String),
	/// An ad-hoc address with an explicit struct tag.
	Addr { addr: u64, tag: String, pointer: bool },
}

/// Validate the `--root` / `--addr` / `--tag` / `--ptr` combination.
pub(crate) fn parse_root_selector(root: Option<String>, addr: Option<String>, tag: Option<String>, pointer: bool) -> Result<RootSelector> {
	match (root, addr, tag) {
		(Some(_), Some(_), _) => Err(PlyError::InvalidRootSelector {
			reason: "--root and --addr are mutually exclusive",
		}),
		(Some(_), None, Some(_)) => Err(PlyError::InvalidRootSelector {
			reason: "--tag only applies to --addr",
		}),
		(Some(name), None, None) => {
			if pointer {
				return Err(PlyError::InvalidRootSelector {
					reason: "--ptr only applies to --addr",
				});
			}
			Ok(RootSelector::Named(name))
		}
		(None, Some(addr), Some(tag)) => Ok(RootSelector::Addr {
			addr: parse_addr(&addr)?,
			tag,
			pointer,
		}),
		(None, Some(_), None) => Err(PlyError::InvalidRootSelector {
			reason: "--addr requires --tag",
		}),
		(None, None, Some(_)) => Err(PlyError::InvalidRootSelector {
			reason: "--tag requires --addr",
		}),
		(None, None, None) => {
			if pointer {
				return Err(PlyError::InvalidRootSelector {
					reason: "--ptr requires --addr",
				});
			}
			Ok(RootSelector::All)
		}
	}
}

/// Render an address as fixed-width hex.
pub(crate) fn addr_hex(addr: u64) -> String {
	format!("0x{addr:016x}")
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}
