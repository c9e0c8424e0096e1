use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub line: usize,  // line of the first declaration
    pub depth: usize, // block depth it was declared at
}

pub type Scope = IndexMap<String, Variable>;

/// Stack of scopes, innermost last.
///
/// Names declared inside a block stay visible after the block closes: leaving a
/// block folds its declarations into the parent.
#[derive(Debug, Clone)]
pub struct Scopes(Vec<Scope>);

impl Scopes {
    pub fn new() -> Self {
        Scopes(vec![Scope::new()])
    }

    /// Current block depth, 0 at top level.
    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    pub fn enter(&mut self) {
        self.0.push(Scope::new());
    }

    pub fn exit(&mut self) {
        if self.0.len() < 2 {
            return;
        }
        if let Some(inner) = self.0.pop() {
            if let Some(parent) = self.0.last_mut() {
                for (name, var) in inner {
                    parent.entry(name).or_insert(var);
                }
            }
        }
    }

    /// Declare in the innermost scope. An existing visible declaration is kept.
    pub fn declare(&mut self, name: &str, line: usize) {
        if self.lookup(name).is_some() {
            return;
        }
        let depth = self.depth();
        if let Some(scope) = self.0.last_mut() {
            scope.insert(name.to_string(), Variable { line, depth });
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.0.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn innermost(&self) -> &Scope {
        &self.0[self.0.len() - 1]
    }

    /// Collapse every open block and return the top-level scope.
    pub fn into_global(mut self) -> Scope {
        while self.0.len() > 1 {
            self.exit();
        }
        self.0.pop().unwrap_or_default()
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Scopes::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_declarations_fold_into_parent() {
        let mut scopes = Scopes::new();
        scopes.declare("V0", 0);
        scopes.enter();
        assert_eq!(scopes.depth(), 1);
        scopes.declare("V1", 1);
        assert!(scopes.innermost().contains_key("V1"));
        assert!(!scopes.innermost().contains_key("V0"));
        scopes.exit();
        assert_eq!(scopes.depth(), 0);
        assert_eq!(scopes.lookup("V1"), Some(&Variable { line: 1, depth: 1 }));
        assert!(scopes.innermost().contains_key("V1"));
    }

    #[test]
    fn first_declaration_wins() {
        let mut scopes = Scopes::new();
        scopes.declare("V2", 3);
        scopes.enter();
        scopes.declare("V2", 5);
        scopes.exit();
        assert_eq!(scopes.lookup("V2"), Some(&Variable { line: 3, depth: 0 }));
    }

    #[test]
    fn exit_at_top_level_is_noop() {
        let mut scopes = Scopes::new();
        scopes.exit();
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn into_global_collapses_open_blocks() {
        let mut scopes = Scopes::new();
        scopes.enter();
        scopes.enter();
        scopes.declare("V7", 9);
        let global = scopes.into_global();
        assert_eq!(global.get("V7").map(|v| v.depth), Some(2));
    }
}
