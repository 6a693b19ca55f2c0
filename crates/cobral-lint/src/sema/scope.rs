//! Scope tree and symbol tables

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use super::builtins::{Builtin, BUILTINS};
use super::types::ValueType;

/// Handle of a scope inside its [`ScopeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub usize);

/// Kind of scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function { name: String },
    Loop,
    /// Flat scope holding symbols merged from imported files
    Imported,
}

/// A declared variable (parameters included)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub ty: ValueType,
    pub constant: bool,
    /// Buffer index of the declaring identifier, `None` for imported symbols
    pub declared_at: Option<usize>,
}

/// A declared or built-in function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub parameters: Vec<String>,
    pub return_type: Option<ValueType>,
    pub declared_at: Option<usize>,
    pub builtin: bool,
}

impl From<&Builtin> for Function {
    fn from(builtin: &Builtin) -> Self {
        Self {
            parameters: builtin.parameters.iter().map(ToString::to_string).collect(),
            return_type: Some(builtin.return_type),
            declared_at: None,
            builtin: true,
        }
    }
}

/// A scope containing symbols
#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Stable identity, e.g. `function:soma:1:1` or `loop:4:5`
    pub name: String,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    variables: HashMap<String, Variable>,
    functions: HashMap<String, Function>,
}

impl Scope {
    /// A scope seeded with the built-in functions
    fn new(kind: ScopeKind, name: String, parent: Option<ScopeId>) -> Self {
        let functions = BUILTINS
            .iter()
            .map(|b| (b.name.to_string(), Function::from(b)))
            .collect();

        Self {
            kind,
            name,
            parent,
            children: Vec::new(),
            variables: HashMap::new(),
            functions,
        }
    }

    /// An empty parentless scope for imported symbols
    pub fn imported() -> Self {
        Self {
            kind: ScopeKind::Imported,
            name: "imported".to_string(),
            parent: None,
            children: Vec::new(),
            variables: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    /// Register a variable, returning whether the name is new to this scope.
    ///
    /// A redeclaration takes over the type and constness but keeps the
    /// first declaration site.
    pub fn define_variable(&mut self, name: impl Into<String>, variable: Variable) -> bool {
        match self.variables.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.ty = variable.ty;
                existing.constant = variable.constant;
                existing.declared_at = existing.declared_at.or(variable.declared_at);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(variable);
                true
            }
        }
    }

    /// Register a function. User declarations replace built-ins of the same name.
    pub fn define_function(&mut self, name: impl Into<String>, function: Function) -> bool {
        let name = name.into();
        match self.functions.get(&name) {
            Some(existing) if !existing.builtin => false,
            _ => {
                self.functions.insert(name, function);
                true
            }
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(name) || self.functions.contains_key(name)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn functions(&self) -> impl Iterator<Item = (&str, &Function)> {
        self.functions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Declared (non built-in) functions
    pub fn user_functions(&self) -> impl Iterator<Item = (&str, &Function)> {
        self.functions().filter(|(_, f)| !f.builtin)
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ScopeKind::Function { .. })
    }

    pub fn is_loop(&self) -> bool {
        self.kind == ScopeKind::Loop
    }
}

/// Arena of scopes rooted at the global scope
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Global, "global".to_string(), None)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn add_child(&mut self, parent: ScopeId, kind: ScopeKind, name: String) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(kind, name, Some(parent)));
        self.scopes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn get_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// All scopes in creation order (parents before children)
    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter().enumerate().map(|(i, s)| (ScopeId(i), s))
    }

    /// The scope itself followed by its parents up to the root
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self.get(id)), |scope| scope.parent.map(|p| self.get(p)))
    }

    pub fn lookup_variable(&self, id: ScopeId, name: &str) -> Option<&Variable> {
        self.ancestors(id).find_map(|scope| scope.variable(name))
    }

    pub fn lookup_function(&self, id: ScopeId, name: &str) -> Option<&Function> {
        self.ancestors(id).find_map(|scope| scope.function(name))
    }

    pub fn is_defined(&self, id: ScopeId, name: &str) -> bool {
        self.ancestors(id).any(|scope| scope.has(name))
    }

    /// Find a scope by its stable name
    pub fn find(&self, name: &str) -> Option<ScopeId> {
        self.iter().find(|(_, s)| s.name == name).map(|(id, _)| id)
    }

    fn fmt_scope(&self, f: &mut fmt::Formatter<'_>, id: ScopeId, indent: usize) -> fmt::Result {
        let scope = self.get(id);
        let mut variables: Vec<_> = scope.variables().collect();
        variables.sort_by_key(|(name, _)| *name);
        let mut functions: Vec<_> = scope.user_functions().collect();
        functions.sort_by_key(|(name, _)| *name);

        writeln!(f, "{:indent$}Scope: {}", "", scope.name)?;
        for (name, variable) in variables {
            let constant = if variable.constant { "constante " } else { "" };
            writeln!(f, "{:indent$}  {constant}{name}: {}", "", variable.ty)?;
        }
        for (name, function) in functions {
            writeln!(f, "{:indent$}  funcao {name}({})", "", function.parameters.join(", "))?;
        }
        for &child in &scope.children {
            self.fmt_scope(f, child, indent + 2)?;
        }
        Ok(())
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScopeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_scope(f, self.root(), 0)
    }
}
