//! Two-scope symbol table: class scope persists across the whole class,
//! subroutine scope is wiped at the start of every method/function/constructor.

use indexmap::IndexMap;

/// Which VM memory segment a variable lives in, or `None` if it was never
/// declared (the table is also used to classify names that might not be
/// variables at all, e.g. a subroutine or class name used as a term).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Static,
    Field,
    Argument,
    Local,
    None,
}

impl VarKind {
    /// The VM segment a push/pop of this kind targets. Only meaningful
    /// for the four real kinds.
    pub fn segment(self) -> &'static str {
        match self {
            VarKind::Static => "static",
            VarKind::Field => "this",
            VarKind::Argument => "argument",
            VarKind::Local => "local",
            VarKind::None => unreachable!("VarKind::None has no VM segment"),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    var_type: String,
    kind: VarKind,
    index: u16,
}

/// Class-scope and subroutine-scope variable tables, plus the running
/// per-kind counters used to assign each new variable the next free index.
#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: IndexMap<String, Entry>,
    subroutine_scope: IndexMap<String, Entry>,
    static_count: u16,
    field_count: u16,
    arg_count: u16,
    local_count: u16,
    /// Declared return types for every method/function/constructor seen so
    /// far, keyed by unqualified subroutine name. Consulted only as
    /// diagnostic metadata; nothing in the emitted VM code depends on it.
    method_return_types: IndexMap<String, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wipes the subroutine scope and its argument/local counters. Class
    /// scope and its counters are untouched.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.arg_count = 0;
        self.local_count = 0;
    }

    /// Records `name`'s declared return type for later lookup. Last
    /// definition wins if a name is somehow redefined.
    pub fn define_method(&mut self, name: &str, return_type: &str) {
        self.method_return_types
            .insert(name.to_string(), return_type.to_string());
    }

    pub fn return_type_of(&self, name: &str) -> Option<&str> {
        self.method_return_types.get(name).map(String::as_str)
    }

    /// Adds a new variable of the given kind to the appropriate scope,
    /// assigning it the next free index for that kind. A redefinition of
    /// an existing name simply overwrites the earlier entry.
    pub fn define(&mut self, name: &str, var_type: &str, kind: VarKind) {
        let index = match kind {
            VarKind::Static => {
                let idx = self.static_count;
                self.static_count += 1;
                idx
            }
            VarKind::Field => {
                let idx = self.field_count;
                self.field_count += 1;
                idx
            }
            VarKind::Argument => {
                let idx = self.arg_count;
                self.arg_count += 1;
                idx
            }
            VarKind::Local => {
                let idx = self.local_count;
                self.local_count += 1;
                idx
            }
            VarKind::None => unreachable!("cannot define a variable with VarKind::None"),
        };

        let entry = Entry {
            var_type: var_type.to_string(),
            kind,
            index,
        };

        match kind {
            VarKind::Static | VarKind::Field => {
                self.class_scope.insert(name.to_string(), entry);
            }
            VarKind::Argument | VarKind::Local => {
                self.subroutine_scope.insert(name.to_string(), entry);
            }
            VarKind::None => unreachable!(),
        }
    }

    /// How many variables of `kind` have been defined in the scope that
    /// owns it (class scope for Static/Field, subroutine scope otherwise).
    pub fn var_count(&self, kind: VarKind) -> u16 {
        match kind {
            VarKind::Static => self.static_count,
            VarKind::Field => self.field_count,
            VarKind::Argument => self.arg_count,
            VarKind::Local => self.local_count,
            VarKind::None => 0,
        }
    }

    fn lookup(&self, name: &str) -> Option<&Entry> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    /// Subroutine scope shadows class scope: a local/argument named the
    /// same as a field or static hides it for the rest of the subroutine.
    pub fn kind_of(&self, name: &str) -> VarKind {
        self.lookup(name).map_or(VarKind::None, |e| e.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|e| e.var_type.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|e| e.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_scope_persists_across_subroutines() {
        let mut table = SymbolTable::new();
        table.define("count", "int", VarKind::Field);
        table.start_subroutine();
        table.define("x", "int", VarKind::Argument);

        assert_eq!(table.kind_of("count"), VarKind::Field);
        assert_eq!(table.index_of("count"), Some(0));

        table.start_subroutine();
        assert_eq!(table.kind_of("x"), VarKind::None);
        assert_eq!(table.kind_of("count"), VarKind::Field);
    }

    #[test]
    fn indices_increase_per_kind() {
        let mut table = SymbolTable::new();
        table.define("a", "int", VarKind::Static);
        table.define("b", "int", VarKind::Static);
        table.define("c", "boolean", VarKind::Field);

        assert_eq!(table.index_of("a"), Some(0));
        assert_eq!(table.index_of("b"), Some(1));
        assert_eq!(table.index_of("c"), Some(0));
        assert_eq!(table.var_count(VarKind::Static), 2);
        assert_eq!(table.var_count(VarKind::Field), 1);
    }

    #[test]
    fn subroutine_scope_shadows_class_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", VarKind::Field);
        table.start_subroutine();
        table.define("x", "int", VarKind::Local);

        assert_eq!(table.kind_of("x"), VarKind::Local);
        assert_eq!(table.index_of("x"), Some(0));
    }

    #[test]
    fn unknown_name_is_none() {
        let table = SymbolTable::new();
        assert_eq!(table.kind_of("nope"), VarKind::None);
        assert_eq!(table.type_of("nope"), None);
        assert_eq!(table.index_of("nope"), None);
    }

    #[test]
    fn method_return_type_registry() {
        let mut table = SymbolTable::new();
        table.define_method("getCount", "int");
        assert_eq!(table.return_type_of("getCount"), Some("int"));
        assert_eq!(table.return_type_of("missing"), None);
    }

    #[test]
    fn segments_map_to_vm_names() {
        assert_eq!(VarKind::Static.segment(), "static");
        assert_eq!(VarKind::Field.segment(), "this");
        assert_eq!(VarKind::Argument.segment(), "argument");
        assert_eq!(VarKind::Local.segment(), "local");
    }
}
