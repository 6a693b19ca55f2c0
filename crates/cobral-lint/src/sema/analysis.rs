//! The result of one analysis run: scope tree, per-token side tables and
//! the imported symbols

use crate::lexer::Token;

use super::builtins::builtin;
use super::scope::{Function, Scope, ScopeId, ScopeTree, Variable};
use super::types::ValueType;

/// What an identifier occurrence does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    /// A use of a name
    Reference,
    /// The name introduced by `declare`, `constante`, `funcao` or a parameter list
    Declaration,
    /// A type name following a declared variable
    TypeAnnotation,
}

/// Symbols of one document, shared read-only by the rules and queries
#[derive(Debug, Clone)]
pub struct Analysis {
    tree: ScopeTree,
    /// Scope in effect at each buffer index
    scopes: Vec<ScopeId>,
    roles: Vec<TokenRole>,
    imported: Scope,
}

impl Analysis {
    pub(super) fn new(tree: ScopeTree, scopes: Vec<ScopeId>, roles: Vec<TokenRole>) -> Self {
        Self {
            tree,
            scopes,
            roles,
            imported: Scope::imported(),
        }
    }

    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    pub fn imported(&self) -> &Scope {
        &self.imported
    }

    pub fn set_imported(&mut self, imported: Scope) {
        self.imported = imported;
    }

    pub fn scope_of(&self, token: &Token) -> ScopeId {
        self.scopes.get(token.index).copied().unwrap_or(self.tree.root())
    }

    pub fn role_of(&self, token: &Token) -> TokenRole {
        self.roles.get(token.index).copied().unwrap_or(TokenRole::Reference)
    }

    /// Whether `name` resolves from `scope`, imports included. Local
    /// declarations shadow imported ones.
    pub fn is_defined(&self, scope: ScopeId, name: &str) -> bool {
        self.tree.is_defined(scope, name) || self.imported.has(name)
    }

    pub fn variable(&self, scope: ScopeId, name: &str) -> Option<&Variable> {
        self.tree
            .lookup_variable(scope, name)
            .or_else(|| self.imported.variable(name))
    }

    pub fn function(&self, scope: ScopeId, name: &str) -> Option<&Function> {
        self.tree
            .lookup_function(scope, name)
            .or_else(|| self.imported.function(name))
    }

    /// Type of an operand token: literal, then built-in return type, then
    /// declared variable type, then function return type
    pub fn value_type(&self, scope: ScopeId, token: &Token) -> Option<ValueType> {
        if let Some(ty) = ValueType::of_literal(token) {
            return Some(ty);
        }
        if !token.is_identifier() {
            return None;
        }
        let ty = builtin(&token.text)
            .map(|b| b.return_type)
            .or_else(|| self.variable(scope, &token.text).map(|v| v.ty))
            .or_else(|| self.function(scope, &token.text).and_then(|f| f.return_type))?;
        ty.is_known().then_some(ty)
    }
}
