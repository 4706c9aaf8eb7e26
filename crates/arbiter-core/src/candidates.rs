//! Builder-target selection.
//!
//! Given scanned class declarations, pick the ones a builder can be generated for:
//! concrete classes with value semantics (`data`) and a primary constructor. Each
//! rejected declaration is reported once, with the first reason that applies.
//! Emitting the builder itself happens elsewhere.

use std::convert::Infallible;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DecisionError;
use crate::runtime::{Decision, Evaluator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Interface,
    Object,
    EnumClass,
    AnnotationClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Data,
    Abstract,
    Sealed,
    Open,
    Inner,
    Value,
}

/// One declaration as reported by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,

    #[serde(default = "primary_constructor_default")]
    pub has_primary_constructor: bool,
}

fn primary_constructor_default() -> bool {
    true
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Vec::new(),
            has_primary_constructor: true,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn without_primary_constructor(mut self) -> Self {
        self.has_primary_constructor = false;
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_abstract(&self) -> bool {
        self.kind == DeclarationKind::Interface
            || self.has_modifier(Modifier::Abstract)
            || self.has_modifier(Modifier::Sealed)
    }
}

/// Why a declaration cannot get a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotAClass,
    Abstract,
    NotDataClass,
    NoPrimaryConstructor,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::NotAClass => "is not a class",
            RejectReason::Abstract => "is abstract",
            RejectReason::NotDataClass => "is not a data class",
            RejectReason::NoPrimaryConstructor => "has no primary constructor",
        };
        f.write_str(text)
    }
}

/// A diagnostic for one rejected declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection<'d> {
    pub declaration: &'d Declaration,
    pub reason: RejectReason,
}

impl fmt::Display for Rejection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.declaration.name, self.reason)
    }
}

/// Keep the declarations a builder can be generated for, in input order.
///
/// `report` is called once per rejected declaration, as the side effect of the
/// rejection.
pub fn select_builder_targets<'d, R>(
    evaluator: &Evaluator,
    declarations: &'d [Declaration],
    mut report: R,
) -> Result<Vec<&'d Declaration>, DecisionError<Infallible>>
where
    R: FnMut(Rejection<'d>),
{
    evaluator.filter(declarations, |ctx: &mut Decision<'_, Infallible>, decl| {
        let decl: &'d Declaration = *decl;
        let checks = [
            (decl.kind != DeclarationKind::Class, RejectReason::NotAClass),
            (decl.is_abstract(), RejectReason::Abstract),
            (!decl.has_modifier(Modifier::Data), RejectReason::NotDataClass),
            (!decl.has_primary_constructor, RejectReason::NoPrimaryConstructor),
        ];
        for (failed, reason) in checks {
            ctx.reject_if_then(
                || failed,
                || {
                    report(Rejection {
                        declaration: decl,
                        reason,
                    });
                    Ok(())
                },
            )?;
        }
        ctx.accept()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn data_class(name: &str) -> Declaration {
        Declaration::new(name, DeclarationKind::Class).with_modifier(Modifier::Data)
    }

    #[test]
    fn keeps_concrete_data_classes_in_order() {
        let decls = vec![
            data_class("User"),
            Declaration::new("Repo", DeclarationKind::Interface),
            data_class("Order"),
        ];

        let mut rejected = Vec::new();
        let kept = select_builder_targets(&Evaluator::default(), &decls, |r| {
            rejected.push(r.to_string())
        })
        .unwrap();

        let names: Vec<_> = kept.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Order"]);
        assert_eq!(rejected, vec!["Repo is not a class".to_string()]);
    }

    #[rstest]
    #[case::interface(Declaration::new("A", DeclarationKind::Interface), RejectReason::NotAClass)]
    #[case::object(
        Declaration::new("A", DeclarationKind::Object).with_modifier(Modifier::Data),
        RejectReason::NotAClass
    )]
    #[case::abstract_class(
        data_class("A").with_modifier(Modifier::Abstract),
        RejectReason::Abstract
    )]
    #[case::sealed_class(data_class("A").with_modifier(Modifier::Sealed), RejectReason::Abstract)]
    #[case::plain_class(Declaration::new("A", DeclarationKind::Class), RejectReason::NotDataClass)]
    #[case::no_constructor(
        data_class("A").without_primary_constructor(),
        RejectReason::NoPrimaryConstructor
    )]
    fn reports_first_failing_reason(#[case] decl: Declaration, #[case] expected: RejectReason) {
        let decls = [decl];
        let mut reasons = Vec::new();
        let kept = select_builder_targets(&Evaluator::default(), &decls, |r| {
            reasons.push(r.reason)
        })
        .unwrap();

        assert!(kept.is_empty());
        assert_eq!(reasons, vec![expected]);
    }

    #[test]
    fn accepted_declarations_are_not_reported() {
        let decls = [data_class("User")];
        let mut count = 0;
        let kept = select_builder_targets(&Evaluator::default(), &decls, |_| count += 1).unwrap();

        assert_eq!(kept.len(), 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn declaration_json_defaults() {
        let json = r#"{"name":"User","kind":"class","modifiers":["data"]}"#;
        let decl: Declaration = serde_json::from_str(json).unwrap();
        assert_eq!(decl, data_class("User"));
    }
}
