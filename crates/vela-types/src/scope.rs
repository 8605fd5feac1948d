//! Scopes: per-package name→entity tables with parent nesting
//!
//! A package owns a tree of scopes. The top-level scope has no parent;
//! block-level scopes nest under it. Lookup is scope-local, resolve walks
//! outward through parents. Iteration follows declaration order so output
//! is deterministic.

use crate::entity::Entity;
use crate::error::DuplicateEntity;
use rustc_hash::FxHashMap;

/// Scope identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    /// The package's top-level scope
    pub const TOP: ScopeId = ScopeId(0);
}

/// One scope in the scope tree
#[derive(Debug, Clone)]
pub struct Scope {
    /// Scope ID
    id: ScopeId,
    /// Parent scope (None for the top-level scope)
    parent: Option<ScopeId>,
    /// Entities declared in this scope
    entities: FxHashMap<String, Entity>,
    /// Names in declaration order
    order: Vec<String>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>) -> Self {
        Scope {
            id,
            parent,
            entities: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Scope id
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Parent scope id, None for the top-level scope
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Look up an entity declared in this scope (no parent walk)
    pub fn lookup(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Number of entities declared in this scope
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether this scope declares nothing
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate entities in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().map(|name| &self.entities[name])
    }

    /// Names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Arena of scopes for one package
///
/// The tree always starts with the top-level scope at [`ScopeId::TOP`].
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// Create a scope tree containing only the top-level scope
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope::new(ScopeId::TOP, None)],
        }
    }

    /// Create a child scope under `parent`
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, Some(parent)));
        id
    }

    /// Get a scope by id
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    /// The package's top-level scope
    pub fn top(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Declare an entity in a scope
    ///
    /// Fails if the scope already declares the name; names are unique
    /// within one scope.
    pub fn insert(&mut self, id: ScopeId, entity: Entity) -> Result<(), DuplicateEntity> {
        let scope = &mut self.scopes[id.0 as usize];
        if scope.entities.contains_key(&entity.name) {
            return Err(DuplicateEntity {
                name: entity.name.clone(),
            });
        }
        scope.order.push(entity.name.clone());
        scope.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Resolve a name starting at `id`, walking outward through parents
    pub fn resolve(&self, id: ScopeId, name: &str) -> Option<&Entity> {
        let mut current = id;
        loop {
            let scope = &self.scopes[current.0 as usize];
            if let Some(entity) = scope.entities.get(name) {
                return Some(entity);
            }
            match scope.parent {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }
}
