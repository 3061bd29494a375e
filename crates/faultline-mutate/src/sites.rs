//! Annotation site discovery
//!
//! A site is one place in the tree where a type annotation is present. Sites
//! are collected in a fixed order so that a seed's draw sequence lines up with
//! the same locations on every run: for each function, parameters first, then
//! the return annotation, then body statements, with nested definitions
//! visited where they appear. Unannotated parameters and signatures produce
//! no site at all and therefore never consume a random draw.

use faultline_pycst::{AnnAssign, FunctionDef, Module, Param, Stmt, TypeExpr};

/// One annotated location in a parsed module
pub enum Site<'a> {
    /// An annotated parameter
    Param {
        param: &'a Param,
        annotation: &'a TypeExpr,
    },
    /// A function's return annotation
    Return {
        def: &'a FunctionDef,
        annotation: &'a TypeExpr,
    },
    /// An annotated assignment statement
    VarAnn { ann: &'a AnnAssign },
}

impl<'a> Site<'a> {
    /// The annotation expression at this site
    pub fn annotation(&self) -> &'a TypeExpr {
        match self {
            Site::Param { annotation, .. } => annotation,
            Site::Return { annotation, .. } => annotation,
            Site::VarAnn { ann } => &ann.annotation,
        }
    }
}

/// Collect every annotation site in the module, in traversal order
pub fn collect_sites(module: &Module) -> Vec<Site<'_>> {
    let mut sites = Vec::new();
    collect_stmts(&module.body, &mut sites);
    sites
}

fn collect_stmts<'a>(stmts: &'a [Stmt], sites: &mut Vec<Site<'a>>) {
    for stmt in stmts {
        match stmt {
            Stmt::FunctionDef(def) => collect_def(def, sites),
            Stmt::AnnAssign(ann) => sites.push(Site::VarAnn { ann }),
            Stmt::Compound(compound) => collect_stmts(compound.body.stmts(), sites),
            Stmt::Opaque(_) => {}
        }
    }
}

fn collect_def<'a>(def: &'a FunctionDef, sites: &mut Vec<Site<'a>>) {
    for param in &def.params {
        if let Some(annotation) = &param.annotation {
            sites.push(Site::Param { param, annotation });
        }
    }
    if let Some(annotation) = &def.returns {
        sites.push(Site::Return { def, annotation });
    }
    collect_stmts(def.body.stmts(), sites);
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_pycst::parse_module;

    fn site_slices(src: &str) -> Vec<String> {
        let module = parse_module(src).unwrap();
        collect_sites(&module)
            .iter()
            .map(|s| s.annotation().span().slice(src).to_string())
            .collect()
    }

    #[test]
    fn params_then_return_then_body() {
        let src = "def f(a: int, b, c: str) -> bool:\n    x: float = 1.0\n    return True\n";
        assert_eq!(site_slices(src), vec!["int", "str", "bool", "float"]);
    }

    #[test]
    fn unannotated_functions_yield_nothing() {
        assert!(site_slices("def f(x):\n    return x\n").is_empty());
    }

    #[test]
    fn nested_defs_visited_in_place() {
        let src = "def outer(a: int):\n    def inner(b: str) -> bytes:\n        pass\n    y: list = []\n";
        assert_eq!(site_slices(src), vec!["int", "str", "bytes", "list"]);
    }

    #[test]
    fn sites_inside_compound_bodies_are_found() {
        let src = "class C:\n    version: int = 1\n    def m(self, x: str):\n        if x:\n            y: bool = True\n";
        assert_eq!(site_slices(src), vec!["int", "str", "bool"]);
    }
}
