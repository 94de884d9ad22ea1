/// Bounded variable table

use crate::arena::Val;
use crate::error::{BasicError, Result};
use crate::host::HostFn;

/// Number of variable slots
pub const VAR_COUNT: usize = 32;

/// Maximum significant bytes of a variable name; longer names are truncated
pub const VAR_NAME_LEN: usize = 7;

/// What a variable slot currently holds
pub enum VarKind<W> {
    /// A numeric value
    Value(Val),
    /// A registered host function
    Func(HostFn<W>),
}

/// One entry in the variable table: a NUL-padded short name and its payload
///
/// A slot whose name starts with NUL is free.
pub struct Var<W> {
    name: [u8; VAR_NAME_LEN],
    kind: VarKind<W>,
}

impl<W> Var<W> {
    fn free() -> Self {
        Self {
            name: [0; VAR_NAME_LEN],
            kind: VarKind::Value(0.0),
        }
    }

    fn is_free(&self) -> bool {
        self.name[0] == 0
    }

    /// Significant name bytes as text
    pub fn name(&self) -> &str {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(VAR_NAME_LEN);
        std::str::from_utf8(&self.name[..len]).unwrap_or("?")
    }

    /// Current slot payload
    pub fn kind(&self) -> &VarKind<W> {
        &self.kind
    }

    fn matches(&self, name: &[u8]) -> bool {
        let len = name.len();
        self.name[..len] == *name && (len == VAR_NAME_LEN || self.name[len] == 0)
    }
}

/// Fixed-capacity name-to-slot mapping
///
/// Lookup is a linear scan; the first byte-exact match wins. An unknown name
/// claims the first free slot, so a name resolves to the same index for the
/// process lifetime.
pub struct VarTable<W> {
    slots: [Var<W>; VAR_COUNT],
}

impl<W> Default for VarTable<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> VarTable<W> {
    /// Create a table of free slots
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Var::free()),
        }
    }

    /// Resolve a name to its slot index, claiming a free slot on first
    /// sighting
    ///
    /// Names are significant to [`VAR_NAME_LEN`] bytes and matched
    /// case-sensitively. Fails when the table is full and the name is new.
    pub fn find_or_create(&mut self, name: &[u8]) -> Result<u8> {
        let name = &name[..name.len().min(VAR_NAME_LEN)];
        let mut first_free = None;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.matches(name) {
                return Ok(i as u8);
            }
            if first_free.is_none() && slot.is_free() {
                first_free = Some(i);
            }
        }
        let i = first_free.ok_or(BasicError::TooManyVariables)?;
        self.slots[i].name[..name.len()].copy_from_slice(name);
        Ok(i as u8)
    }

    fn slot(&self, idx: u8) -> Result<&Var<W>> {
        self.slots
            .get(idx as usize)
            .ok_or(BasicError::AssertFailed)
    }

    /// Slot payload by index
    pub fn kind(&self, idx: u8) -> Result<&VarKind<W>> {
        Ok(&self.slot(idx)?.kind)
    }

    /// Slot name by index
    pub fn name(&self, idx: u8) -> Result<&str> {
        Ok(self.slot(idx)?.name())
    }

    /// Numeric value of a slot; function-typed slots read as zero
    pub fn value(&self, idx: u8) -> Result<Val> {
        Ok(match self.slot(idx)?.kind {
            VarKind::Value(v) => v,
            VarKind::Func(_) => 0.0,
        })
    }

    /// Store a numeric value, making the slot value-typed
    pub fn set_value(&mut self, idx: u8, v: Val) -> Result<()> {
        let slot = self
            .slots
            .get_mut(idx as usize)
            .ok_or(BasicError::AssertFailed)?;
        slot.kind = VarKind::Value(v);
        Ok(())
    }

    /// Store a host function, making the slot function-typed
    pub fn set_func(&mut self, idx: u8, f: HostFn<W>) -> Result<()> {
        let slot = self
            .slots
            .get_mut(idx as usize)
            .ok_or(BasicError::AssertFailed)?;
        slot.kind = VarKind::Func(f);
        Ok(())
    }

    /// Iterate live slots with their indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Var<W>)> {
        self.slots.iter().enumerate().filter(|(_, s)| !s.is_free())
    }
}
