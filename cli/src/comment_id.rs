//! # Comment ID Command
//!
//! Prints the documentation comment identifier of a member, e.g. to check what a
//! manifest entry will be looked up as.

use xmldoc_core::identity::{MethodIdentity, NamedType, PropertyIdentity, TypeRef};
use xmldoc_core::{comment_id_for_method, comment_id_for_property, comment_id_for_type};

/// Arguments for the comment-id command.
#[derive(clap::Args, Debug, Clone)]
pub struct CommentIdArgs {
    /// Member kind and its signature.
    #[clap(subcommand)]
    pub member: MemberKind,
}

/// Member to build an identifier for. Types use the `Ns.Outer+Inner`, `` List`1 ``,
/// `List<System.Int32>`, `T[]`, `T&` and `!!0` notation.
#[derive(clap::Subcommand, Debug, Clone)]
pub enum MemberKind {
    /// A method, constructor (`.ctor`) or operator.
    Method {
        /// Declaring type.
        declaring_type: NamedType,
        /// Method name.
        name: String,
        /// Parameter type, in signature order. Repeatable.
        #[clap(long = "param")]
        params: Vec<TypeRef>,
        /// Number of generic parameters declared by the method itself.
        #[clap(long, default_value_t = 0)]
        generic_arity: usize,
        /// Return type; only used by conversion operators.
        #[clap(long)]
        returns: Option<TypeRef>,
    },
    /// A property or indexer.
    Property {
        /// Declaring type.
        declaring_type: NamedType,
        /// Property name (`Item` for indexers).
        name: String,
        /// Indexer parameter type. Repeatable.
        #[clap(long = "param")]
        params: Vec<TypeRef>,
    },
    /// A type.
    Type {
        /// The type.
        declaring_type: NamedType,
    },
}

/// Builds the identifier for the requested member.
pub fn comment_id(args: &CommentIdArgs) -> String {
    match &args.member {
        MemberKind::Method {
            declaring_type,
            name,
            params,
            generic_arity,
            returns,
        } => {
            let mut method = MethodIdentity::new(declaring_type.clone(), name.clone(), params.clone())
                .with_generic_arity(*generic_arity);
            if let Some(returns) = returns {
                method = method.with_return_type(returns.clone());
            }
            comment_id_for_method(&method)
        }
        MemberKind::Property {
            declaring_type,
            name,
            params,
        } => {
            let mut property = PropertyIdentity::new(declaring_type.clone(), name.clone());
            property.parameters = params.clone();
            comment_id_for_property(&property)
        }
        MemberKind::Type { declaring_type } => comment_id_for_type(declaring_type),
    }
}

/// Executes the comment-id command.
pub fn execute(args: &CommentIdArgs) {
    println!("{}", comment_id(args));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[clap(flatten)]
        args: CommentIdArgs,
    }

    fn run(argv: &[&str]) -> String {
        let harness = Harness::try_parse_from(std::iter::once("comment-id").chain(argv.iter().copied()))
            .unwrap();
        comment_id(&harness.args)
    }

    #[test]
    fn test_method_id() {
        assert_eq!(
            run(&[
                "method",
                "Acme.Repo`1",
                "Find",
                "--param",
                "!!0",
                "--param",
                "System.Collections.Generic.List<System.Int32>",
                "--generic-arity",
                "1",
            ]),
            "M:Acme.Repo`1.Find``1(``0,System.Collections.Generic.List{System.Int32})"
        );
    }

    #[test]
    fn test_method_without_parameters() {
        assert_eq!(run(&["method", "Acme.Api.Health", "Ping"]), "M:Acme.Api.Health.Ping");
    }

    #[test]
    fn test_property_and_type_ids() {
        assert_eq!(
            run(&["property", "Acme.Models.Paging", "Page"]),
            "P:Acme.Models.Paging.Page"
        );
        assert_eq!(
            run(&["type", "Acme.Models.Outer+Inner"]),
            "T:Acme.Models.Outer.Inner"
        );
    }

    #[test]
    fn test_invalid_type_is_rejected() {
        let result = Harness::try_parse_from(["comment-id", "type", "Acme.<"]);
        assert!(result.is_err());
    }
}
