//! The environment arena (§3 "Environment", §9 "Cyclic environment
//! graphs from `Y*`"). Frames are addressed by an integer id into a side
//! table owned by the running machine, rather than by direct reference,
//! so that the self-referential environment `rec` creates cannot form a
//! reference cycle in Rust's ownership model. The table is dropped
//! wholesale when the machine finishes running.

use std::collections::HashMap;

use crate::common::value::Value;

/// An index into an [`EnvTable`]. Frame `0` is always the primitive
/// environment, the root of every environment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvId(pub usize);

#[derive(Debug, Default)]
pub struct EnvFrame {
    pub parent: Option<EnvId>,
    pub bindings: HashMap<String, Value>,
}

/// Owns every environment frame created during a run.
#[derive(Debug, Default)]
pub struct EnvTable {
    frames: Vec<EnvFrame>,
}

impl EnvTable {
    pub fn new() -> EnvTable {
        EnvTable { frames: vec![EnvFrame::default()] }
    }

    pub fn root(&self) -> EnvId {
        EnvId(0)
    }

    /// Allocates a new frame whose parent is `parent`.
    pub fn child(&mut self, parent: EnvId) -> EnvId {
        self.frames.push(EnvFrame { parent: Some(parent), bindings: HashMap::new() });
        EnvId(self.frames.len() - 1)
    }

    pub fn frame(&self, id: EnvId) -> &EnvFrame {
        &self.frames[id.0]
    }

    pub fn frame_mut(&mut self, id: EnvId) -> &mut EnvFrame {
        &mut self.frames[id.0]
    }

    pub fn bind(&mut self, id: EnvId, name: String, value: Value) {
        self.frame_mut(id).bindings.insert(name, value);
    }

    /// Resolves `name` by walking from `id` up through parent links.
    pub fn lookup(&self, id: EnvId, name: &str) -> Option<&Value> {
        let mut current = Some(id);
        while let Some(env_id) = current {
            let frame = self.frame(env_id);
            if let Some(value) = frame.bindings.get(name) {
                return Some(value);
            }
            current = frame.parent;
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup_walks_parent_chain() {
        let mut table = EnvTable::new();
        table.bind(table.root(), "x".to_string(), Value::Bool(true));

        let child = table.child(table.root());
        table.bind(child, "y".to_string(), Value::Bool(false));

        assert_eq!(table.lookup(child, "x"), Some(&Value::Bool(true)));
        assert_eq!(table.lookup(child, "y"), Some(&Value::Bool(false)));
        assert_eq!(table.lookup(table.root(), "y"), None);
    }
}
