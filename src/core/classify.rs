//! Component classification.
//!
//! A component is a capitalized function-like declaration whose body returns
//! JSX. Only returns at the top level of the body are considered: a component
//! whose markup is returned from inside an `if` or a loop is not recognized.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, Decl, DefaultDecl, ExportDefaultDecl, Expr, FnDecl,
    Function, JSXElement, JSXFragment, Lit, Module, ObjectPatProp, Pat, PropName, Stmt, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

/// Location facts about an existing block body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBody {
    pub span: Span,
    pub first_stmt: Option<Span>,
    /// Last statement of the body's directive prologue (`'use memo';`).
    pub last_directive: Option<Span>,
    /// A top-level `const { t } = ...` already exists.
    pub has_t_binding: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedBody {
    Block(BlockBody),
    /// `() => <div/>`: treated as `() => { return <div/>; }`.
    /// `expr` covers the whole body expression, parentheses included.
    ImplicitReturn { expr: Span },
    /// Expression body that does not yield markup, or no body at all.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentCandidate {
    pub name: String,
    pub span: Span,
    pub body: NormalizedBody,
    pub is_component: bool,
}

#[derive(Debug, Default)]
pub struct Classification {
    /// The file contains at least one JSX element or fragment anywhere.
    pub has_markup: bool,
    pub candidates: Vec<ComponentCandidate>,
}

impl Classification {
    pub fn components(&self) -> impl Iterator<Item = &ComponentCandidate> {
        self.candidates.iter().filter(|c| c.is_component)
    }
}

pub fn classify(module: &Module) -> Classification {
    let mut collector = ComponentCollector::default();
    module.visit_with(&mut collector);
    Classification {
        has_markup: collector.has_markup,
        candidates: collector.candidates,
    }
}

fn is_component_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
}

fn unwrap_parens(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(paren) = expr {
        expr = &paren.expr;
    }
    expr
}

fn is_markup(expr: &Expr) -> bool {
    matches!(
        unwrap_parens(expr),
        Expr::JSXElement(_) | Expr::JSXFragment(_)
    )
}

fn returns_markup(block: &BlockStmt) -> bool {
    block.stmts.iter().any(|stmt| {
        matches!(stmt, Stmt::Return(ret) if ret.arg.as_deref().is_some_and(is_markup))
    })
}

fn destructures_t(pat: &Pat) -> bool {
    let Pat::Object(obj) = pat else {
        return false;
    };
    obj.props.iter().any(|prop| match prop {
        ObjectPatProp::Assign(assign) => assign.key.sym == "t",
        ObjectPatProp::KeyValue(kv) => matches!(&kv.key, PropName::Ident(key) if key.sym == "t"),
        ObjectPatProp::Rest(_) => false,
    })
}

/// A string-literal expression statement, like `'use client';`.
pub fn is_directive(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Expr(expr) if matches!(&*expr.expr, Expr::Lit(Lit::Str(_))))
}

fn has_t_binding(block: &BlockStmt) -> bool {
    block.stmts.iter().any(|stmt| match stmt {
        Stmt::Decl(Decl::Var(var)) => var.decls.iter().any(|decl| destructures_t(&decl.name)),
        _ => false,
    })
}

fn block_candidate(name: &str, span: Span, block: &BlockStmt) -> ComponentCandidate {
    ComponentCandidate {
        name: name.to_string(),
        span,
        body: NormalizedBody::Block(BlockBody {
            span: block.span,
            first_stmt: block.stmts.first().map(Spanned::span),
            last_directive: block
                .stmts
                .iter()
                .take_while(|stmt| is_directive(stmt))
                .last()
                .map(Spanned::span),
            has_t_binding: has_t_binding(block),
        }),
        is_component: returns_markup(block),
    }
}

#[derive(Default)]
struct ComponentCollector {
    has_markup: bool,
    candidates: Vec<ComponentCandidate>,
}

impl ComponentCollector {
    fn consider_function(&mut self, name: &str, span: Span, function: &Function) {
        if !is_component_name(name) {
            return;
        }
        let candidate = match &function.body {
            Some(block) => block_candidate(name, span, block),
            None => ComponentCandidate {
                name: name.to_string(),
                span,
                body: NormalizedBody::Unsupported,
                is_component: false,
            },
        };
        self.candidates.push(candidate);
    }

    fn consider_arrow(&mut self, name: &str, span: Span, arrow: &ArrowExpr) {
        if !is_component_name(name) {
            return;
        }
        let candidate = match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => block_candidate(name, span, block),
            BlockStmtOrExpr::Expr(expr) if is_markup(expr) => ComponentCandidate {
                name: name.to_string(),
                span,
                body: NormalizedBody::ImplicitReturn { expr: expr.span() },
                is_component: true,
            },
            BlockStmtOrExpr::Expr(_) => ComponentCandidate {
                name: name.to_string(),
                span,
                body: NormalizedBody::Unsupported,
                is_component: false,
            },
        };
        self.candidates.push(candidate);
    }
}

impl Visit for ComponentCollector {
    fn visit_jsx_element(&mut self, node: &JSXElement) {
        self.has_markup = true;
        node.visit_children_with(self);
    }

    fn visit_jsx_fragment(&mut self, node: &JSXFragment) {
        self.has_markup = true;
        node.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, node: &FnDecl) {
        self.consider_function(node.ident.sym.as_str(), node.function.span, &node.function);
        node.visit_children_with(self);
    }

    // `export default function App() {}` is a named function expression in swc.
    fn visit_export_default_decl(&mut self, node: &ExportDefaultDecl) {
        if let DefaultDecl::Fn(fn_expr) = &node.decl
            && let Some(ident) = &fn_expr.ident
        {
            self.consider_function(ident.sym.as_str(), node.span, &fn_expr.function);
        }
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Pat::Ident(binding) = &node.name
            && let Some(init) = &node.init
        {
            let name = binding.id.sym.as_str();
            match &**init {
                Expr::Arrow(arrow) => self.consider_arrow(name, node.span, arrow),
                Expr::Fn(fn_expr) => self.consider_function(name, node.span, &fn_expr.function),
                _ => {}
            }
        }
        node.visit_children_with(self);
    }
}
