//! The scope model: a stack-disciplined chain of frames mirroring lexical
//! nesting (package → type → method/lambda/initializer → block).
//!
//! Each frame renders as a role-marked path segment, so symbol keys built
//! from paths can never collide across roles. Both passes rebuild the
//! chain from the same tree, which keeps their key spaces identical.

use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeRole {
    Package,
    Type,
    Method,
    Block,
    Lambda,
    StaticInit,
}

impl ScopeRole {
    /// Method-like frames: bodies that own parameters and a method key.
    pub fn is_callable(self) -> bool {
        matches!(
            self,
            ScopeRole::Method | ScopeRole::Lambda | ScopeRole::StaticInit
        )
    }
}

#[derive(Debug, Clone)]
pub struct ScopeFrame {
    pub role: ScopeRole,
    pub label: String,
}

impl ScopeFrame {
    /// Role-marked path segment for key building.
    pub fn segment(&self) -> String {
        match self.role {
            ScopeRole::Package => self.label.clone(),
            ScopeRole::Type => format!("T{}", self.label),
            ScopeRole::Method => format!("M{}", self.label),
            ScopeRole::Block => format!("B{}", self.label),
            ScopeRole::Lambda => format!("M:lambda{}", self.label),
            ScopeRole::StaticInit => "M:static".to_string(),
        }
    }
}

/// Field lookup key for a member of a named type.
pub fn field_key(type_name: &str, member: &str) -> String {
    format!("fT{type_name}.{member}")
}

/// Method lookup key for a member of a named type. Constructors are
/// modeled as methods named after their type.
pub fn method_key(type_name: &str, method: &str) -> String {
    format!("mT{type_name}.M{method}")
}

/// The frame stack. Created fresh per traversal and never shared between
/// passes; pushes and pops must pair per node enter/exit.
#[derive(Debug)]
pub struct ScopeChain {
    frames: Vec<ScopeFrame>,
}

impl ScopeChain {
    /// A new chain rooted at a package frame. The label is the dotted
    /// package name, empty when the file declares none.
    pub fn new(package: &str) -> Self {
        ScopeChain {
            frames: vec![ScopeFrame {
                role: ScopeRole::Package,
                label: package.to_string(),
            }],
        }
    }

    pub fn push(&mut self, role: ScopeRole, label: impl Into<String>) {
        self.frames.push(ScopeFrame {
            role,
            label: label.into(),
        });
        trace!(path = %self.path_string(), "scope enter");
    }

    pub fn pop(&mut self) {
        debug_assert!(self.frames.len() > 1, "popped past the root scope");
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Full path, root to leaf.
    pub fn path_string(&self) -> String {
        self.path_at(self.frames.len() - 1)
    }

    /// Path over the outermost `upto + 1` frames.
    fn path_at(&self, upto: usize) -> String {
        let mut path = String::new();
        for (i, frame) in self.frames[..=upto].iter().enumerate() {
            if i > 0 {
                path.push('.');
            }
            path.push_str(&frame.segment());
        }
        path
    }

    /// Join of the `n` innermost segments (fewer if the chain is shorter).
    pub fn prefix_path(&self, n: usize) -> String {
        let start = self.frames.len().saturating_sub(n);
        let mut path = String::new();
        for (i, frame) in self.frames[start..].iter().enumerate() {
            if i > 0 {
                path.push('.');
            }
            path.push_str(&frame.segment());
        }
        path
    }

    /// Innermost frame with the given role.
    pub fn nearest_ancestor(&self, role: ScopeRole) -> Option<&ScopeFrame> {
        self.frames.iter().rev().find(|f| f.role == role)
    }

    /// Innermost method-like frame (method, lambda, or initializer).
    pub fn nearest_callable(&self) -> Option<&ScopeFrame> {
        self.frames.iter().rev().find(|f| f.role.is_callable())
    }

    /// Label of the nearest enclosing type scope.
    pub fn enclosing_type_label(&self) -> Option<&str> {
        self.nearest_ancestor(ScopeRole::Type)
            .map(|f| f.label.as_str())
    }

    /// Variable key for a name declared in the current scope.
    pub fn variable_key(&self, name: &str) -> String {
        self.variable_key_at(self.frames.len() - 1, name)
    }

    /// Variable key for a name at the scope truncated to `upto + 1`
    /// frames; drives the innermost-out resolution walk.
    pub fn variable_key_at(&self, upto: usize, name: &str) -> String {
        format!("v{}.{}", self.path_at(upto), name)
    }

    /// Field record key under the nearest enclosing type, or `None` when
    /// there is no enclosing type (such fields are silently skipped).
    pub fn field_record_key(&self, name: &str) -> Option<String> {
        self.enclosing_type_label()
            .map(|label| field_key(label, name))
    }

    /// Method key of the innermost frame: the two innermost segments, so
    /// a method directly inside a type matches `method_key` lookups.
    pub fn method_record_key(&self) -> String {
        format!("m{}", self.prefix_path(2))
    }

    /// Labels of enclosing type frames, innermost first; drives the field
    /// fallback walk for unresolved simple names.
    pub fn type_labels_outward(&self) -> impl Iterator<Item = &str> {
        self.frames
            .iter()
            .rev()
            .filter(|f| f.role == ScopeRole::Type)
            .map(|f| f.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chain() -> ScopeChain {
        let mut scopes = ScopeChain::new("com.example");
        scopes.push(ScopeRole::Type, "Foo");
        scopes.push(ScopeRole::Method, "run");
        scopes.push(ScopeRole::Block, "41");
        scopes
    }

    #[test]
    fn path_joins_role_marked_segments() {
        let scopes = sample_chain();
        assert_eq!(scopes.path_string(), "com.example.TFoo.Mrun.B41");
    }

    #[test]
    fn empty_package_keeps_a_root_segment() {
        let mut scopes = ScopeChain::new("");
        scopes.push(ScopeRole::Type, "Foo");
        assert_eq!(scopes.path_string(), ".TFoo");
        assert_eq!(scopes.variable_key("x"), "v.TFoo.x");
    }

    #[test]
    fn prefix_path_takes_innermost_segments() {
        let scopes = sample_chain();
        assert_eq!(scopes.prefix_path(2), "Mrun.B41");
        assert_eq!(scopes.prefix_path(99), "com.example.TFoo.Mrun.B41");
    }

    #[test]
    fn nearest_ancestor_by_role() {
        let mut scopes = sample_chain();
        assert_eq!(scopes.enclosing_type_label(), Some("Foo"));
        scopes.push(ScopeRole::Lambda, "77");
        let callable = scopes.nearest_callable().unwrap();
        assert_eq!(callable.role, ScopeRole::Lambda);
        scopes.pop();
        let callable = scopes.nearest_callable().unwrap();
        assert_eq!(callable.role, ScopeRole::Method);
    }

    #[test]
    fn method_record_key_uses_two_innermost_segments() {
        let mut scopes = ScopeChain::new("pkg");
        scopes.push(ScopeRole::Type, "Foo");
        scopes.push(ScopeRole::Method, "run");
        assert_eq!(scopes.method_record_key(), "mTFoo.Mrun");
        assert_eq!(scopes.method_record_key(), method_key("Foo", "run"));
    }

    #[test]
    fn variable_keys_truncate_outward() {
        let scopes = sample_chain();
        assert_eq!(scopes.variable_key("x"), "vcom.example.TFoo.Mrun.B41.x");
        assert_eq!(scopes.variable_key_at(1, "x"), "vcom.example.TFoo.x");
        assert_eq!(scopes.variable_key_at(0, "x"), "vcom.example.x");
    }

    #[test]
    fn type_labels_walk_nested_types_outward() {
        let mut scopes = ScopeChain::new("pkg");
        scopes.push(ScopeRole::Type, "Outer");
        scopes.push(ScopeRole::Type, "Inner");
        scopes.push(ScopeRole::Method, "m");
        let labels: Vec<_> = scopes.type_labels_outward().collect();
        assert_eq!(labels, vec!["Inner", "Outer"]);
    }

    #[test]
    fn static_initializer_segment_is_fixed() {
        let mut scopes = ScopeChain::new("pkg");
        scopes.push(ScopeRole::Type, "Foo");
        scopes.push(ScopeRole::StaticInit, "static");
        assert_eq!(scopes.path_string(), "pkg.TFoo.M:static");
    }
}
