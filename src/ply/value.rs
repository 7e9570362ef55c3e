/// Numeric literal payload of a `N_NUM` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumValue {
	/// Read through `num.s64`.
	Signed(i64),
	/// Read through `num.u64`.
	Unsigned(u64),
}

/// Owned snapshot of one AST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	/// Call-like expression with its argument chain flattened into a list.
	Expr {
		/// Function or operator name.
		func: Box<str>,
		/// Arguments in chain order.
		args: Vec<Node>,
		/// The chain was cut at the argument limit.
		truncated: bool,
	},
	/// String literal bytes.
	Str(Vec<u8>),
	/// Numeric literal.
	Num(NumValue),
	/// Unrecognized node tag.
	Other,
	/// Memory for this node could not be read.
	Unreadable,
}

impl Node {
	/// Expression node with a complete argument list.
	pub fn expr(func: impl Into<Box<str>>, args: Vec<Node>) -> Self {
		Self::Expr {
			func: func.into(),
			args,
			truncated: false,
		}
	}

	/// String literal node.
	pub fn string(data: impl Into<Vec<u8>>) -> Self {
		Self::Str(data.into())
	}

	/// Unsigned numeric literal node.
	pub fn unsigned(value: u64) -> Self {
		Self::Num(NumValue::Unsigned(value))
	}

	/// Signed numeric literal node.
	pub fn signed(value: i64) -> Self {
		Self::Num(NumValue::Signed(value))
	}
}

/// Index of a descriptor inside a [`TypeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub usize);

/// One type descriptor. Nested types are arena references, so graphs may share nodes or cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
	/// `void`.
	Void,
	/// Named typedef.
	Typedef(Box<str>),
	/// Named scalar such as `int`.
	Scalar(Box<str>),
	/// Pointer to another type.
	Pointer(TypeId),
	/// Fixed-length array.
	Array {
		/// Element type.
		elem: TypeId,
		/// Element count.
		len: u64,
	},
	/// Named struct.
	Struct(Box<str>),
	/// Function; only the return type is kept.
	Func {
		/// Return type.
		ret: TypeId,
	},
	/// Associative map.
	Map {
		/// Key type.
		key: TypeId,
		/// Value type.
		value: TypeId,
	},
	/// Unrecognized type tag.
	Other,
	/// Memory for this descriptor could not be read.
	Unreadable,
	/// Reading stopped here because a depth or node budget ran out.
	Truncated,
}

/// Arena owning every descriptor of one type graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeArena {
	types: Vec<TypeDesc>,
}

impl TypeArena {
	/// Create an empty arena.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a descriptor and return its id.
	pub fn push(&mut self, desc: TypeDesc) -> TypeId {
		self.types.push(desc);
		TypeId(self.types.len() - 1)
	}

	/// Replace the descriptor at `id`; used to close cycles after reserving a slot.
	pub fn set(&mut self, id: TypeId, desc: TypeDesc) {
		if let Some(slot) = self.types.get_mut(id.0) {
			*slot = desc;
		}
	}

	/// Look up a descriptor.
	pub fn get(&self, id: TypeId) -> Option<&TypeDesc> {
		self.types.get(id.0)
	}

	/// Number of descriptors.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Whether the arena holds no descriptors.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

/// Symbol table entry; the name may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbol {
	/// Raw name bytes.
	pub name: Option<Vec<u8>>,
}

/// Function handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
	/// Raw name bytes.
	pub name: Option<Vec<u8>>,
}
