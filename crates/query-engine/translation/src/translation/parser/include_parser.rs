//! Parses include expressions into include nodes.

use crate::translation::error::Error;
use crate::translation::expr::IncludeExpr;
use crate::translation::nodes::{IncludeNode, Node, ParsedLambda};

pub struct IncludeParser;

impl IncludeParser {
    pub fn parse(includes: &[IncludeExpr]) -> Result<ParsedLambda, Error> {
        let mut nodes = Vec::with_capacity(includes.len());
        for include in includes {
            if include.child_structure_name.is_empty() {
                return Err(Error::NotSupported(
                    "includes without a child structure name".to_string(),
                ));
            }
            if include.id_reference_path.is_empty() || include.object_reference_path.is_empty() {
                return Err(Error::NotSupported(
                    "includes without both reference paths".to_string(),
                ));
            }
            nodes.push(Node::Include(IncludeNode {
                child_structure_name: include.child_structure_name.clone(),
                id_reference_path: include.id_reference_path.clone(),
                object_reference_path: include.object_reference_path.clone(),
            }));
        }
        Ok(ParsedLambda::new(nodes))
    }
}
