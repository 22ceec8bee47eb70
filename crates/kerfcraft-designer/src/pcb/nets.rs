//! Net table: the ordered list of electrical nets of a board.

use kerfcraft_core::{GeometryError, GeometryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a net in a [`NetTable`]. The number is the net's position in the
/// layout file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetId(u32);

impl NetId {
    /// Net 0, the implicit unconnected net.
    pub const UNCONNECTED: NetId = NetId(0);

    pub fn number(self) -> u32 {
        self.0
    }

    pub fn is_connected(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Design rule class of a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NetClass {
    #[default]
    Default,
    Power,
}

impl fmt::Display for NetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetClass::Default => write!(f, "Default"),
            NetClass::Power => write!(f, "Power"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub id: NetId,
    pub name: String,
    pub class: NetClass,
}

/// Nets numbered from 1 in insertion order; net 0 is always present and
/// named `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetTable {
    nets: Vec<Net>,
}

impl Default for NetTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NetTable {
    pub fn new() -> Self {
        Self {
            nets: vec![Net {
                id: NetId::UNCONNECTED,
                name: String::new(),
                class: NetClass::Default,
            }],
        }
    }

    /// Build a table from `(name, class)` pairs in order.
    pub fn from_names<S: AsRef<str>>(entries: &[(S, NetClass)]) -> GeometryResult<Self> {
        let mut table = Self::new();
        for (name, class) in entries {
            table.add(name.as_ref(), *class)?;
        }
        Ok(table)
    }

    pub fn add(&mut self, name: impl Into<String>, class: NetClass) -> GeometryResult<NetId> {
        let name = name.into();
        if name.is_empty() || self.lookup(&name).is_some() {
            return Err(GeometryError::DuplicateNet { name });
        }
        let id = NetId(self.nets.len() as u32);
        self.nets.push(Net { id, name, class });
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<NetId> {
        self.nets.iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// Resolve a name, failing with [`GeometryError::UnknownNet`].
    pub fn require(&self, name: &str) -> GeometryResult<NetId> {
        self.lookup(name)
            .ok_or_else(|| GeometryError::UnknownNet(name.to_string()))
    }

    pub fn get(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.0 as usize)
    }

    pub fn contains(&self, id: NetId) -> bool {
        self.get(id).is_some()
    }

    pub fn number(&self, id: NetId) -> GeometryResult<u32> {
        self.check(id).map(NetId::number)
    }

    pub fn name(&self, id: NetId) -> GeometryResult<&str> {
        self.get(id)
            .map(|n| n.name.as_str())
            .ok_or_else(|| GeometryError::UnknownNet(format!("#{}", id)))
    }

    pub fn check(&self, id: NetId) -> GeometryResult<NetId> {
        if self.contains(id) {
            Ok(id)
        } else {
            Err(GeometryError::UnknownNet(format!("#{}", id)))
        }
    }

    /// All nets including net 0, in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Net> {
        self.nets.iter()
    }

    /// Connected nets of one class, in file order.
    pub fn in_class(&self, class: NetClass) -> impl Iterator<Item = &Net> {
        self.nets
            .iter()
            .skip(1)
            .filter(move |n| n.class == class)
    }

    /// Number of nets including net 0.
    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.len() == 1
    }
}
