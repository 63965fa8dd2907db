//! `impl From<T>` boilerplate for the `SmartNum` / `AstOperand` / `AstNode`
//! families.
//!
//! Every expansion is a lazy, cloneable iterator of fragments, one per
//! catalog entry, in catalog order. The three templates are independent
//! literals: downstream code splices their text verbatim, so whitespace
//! quirks are part of the output format.
use crate::catalog::{self, Catalog, NumTy};

// ————————————————————————————————————————————————————————————————————————————
// TEMPLATES
// ————————————————————————————————————————————————————————————————————————————

/// `T -> SmartNum::Integer`, widened through `i64::from`.
pub fn smart_num_from(ty: NumTy) -> String {
    format!(
        "impl From<{ty}> for SmartNum{{
    fn from(v: {ty}) -> Self {{
        SmartNum::Integer(i64::from(v))
    }}
}}
"
    )
}

/// `T -> AstOperand::Num`, via the `SmartNum` conversion.
pub fn operand_from(ty: NumTy) -> String {
    format!(
        "impl From<{ty}> for AstOperand{{
    fn from(v: {ty}) -> Self {{
        AstOperand::Num(SmartNum::from(v))
    }}
}}
"
    )
}

/// `T -> AstNode` tagged as an operand leaf with no children.
pub fn node_from(ty: NumTy) -> String {
    format!(
        "impl From<{ty}> for AstNode {{
    fn from(v: {ty}) -> Self {{
         AstNode {{
             me: AstNodeTag::Operand(AstOperand::from(v)),
             child: vec![],
         }}
    }}
}}
"
    )
}

// ————————————————————————————————————————————————————————————————————————————
// EXPANSIONS
// ————————————————————————————————————————————————————————————————————————————

pub fn expand_smart_number_conversions() -> impl Iterator<Item = String> + Clone {
    catalog::standard_integers().map(smart_num_from)
}

pub fn expand_operand_conversions() -> impl Iterator<Item = String> + Clone {
    catalog::standard_mixed().map(operand_from)
}

pub fn expand_node_conversions() -> impl Iterator<Item = String> + Clone {
    catalog::standard_mixed().map(node_from)
}

/// Smart-number expansion over the integer entries of `catalog`.
pub fn expand_smart_number_conversions_with(
    catalog: &Catalog,
) -> impl Iterator<Item = String> + Clone + '_ {
    catalog.integers().iter().copied().map(smart_num_from)
}

pub fn expand_operand_conversions_with(
    catalog: &Catalog,
) -> impl Iterator<Item = String> + Clone + '_ {
    catalog.mixed().map(operand_from)
}

pub fn expand_node_conversions_with(
    catalog: &Catalog,
) -> impl Iterator<Item = String> + Clone + '_ {
    catalog.mixed().map(node_from)
}

/// One output group. Declaration order is output order.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GenMode {
    /// `impl From<int> for SmartNum`
    SmartNum,
    /// `impl From<num> for AstOperand`
    Operand,
    /// `impl From<num> for AstNode`
    Node,
}

impl GenMode {
    pub const ALL: [GenMode; 3] = [GenMode::SmartNum, GenMode::Operand, GenMode::Node];

    pub fn label(self) -> &'static str {
        match self {
            GenMode::SmartNum => "smart-num",
            GenMode::Operand => "operand",
            GenMode::Node => "node",
        }
    }

    pub fn fragments(self, catalog: &Catalog) -> Vec<String> {
        match self {
            GenMode::SmartNum => expand_smart_number_conversions_with(catalog).collect(),
            GenMode::Operand => expand_operand_conversions_with(catalog).collect(),
            GenMode::Node => expand_node_conversions_with(catalog).collect(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// OUTPUT BUFFER
// ————————————————————————————————————————————————————————————————————————————

/// Separator written between two groups.
const GROUP_SEPARATOR: &str = "\n\n\n";

/// Accumulates fragment groups into the final splice-ready text.
///
/// Each fragment is followed by a blank line; consecutive groups are
/// separated by [`GROUP_SEPARATOR`].
#[derive(Debug, Default)]
pub struct Codegen {
    out: String,
    groups: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit<I>(&mut self, fragments: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if self.groups > 0 {
            self.out.push_str(GROUP_SEPARATOR);
        }
        self.groups += 1;
        for fragment in fragments {
            self.out.push_str(fragment.as_ref());
            self.out.push('\n');
        }
    }

    pub fn emit_mode(&mut self, mode: GenMode, catalog: &Catalog) {
        let fragments = mode.fragments(catalog);
        tracing::debug!(mode = mode.label(), fragments = fragments.len(), "emitting group");
        self.emit(fragments);
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

/// Render the requested groups, in canonical order, with duplicates dropped.
pub fn render(catalog: &Catalog, modes: &[GenMode]) -> String {
    let mut modes = modes.to_vec();
    modes.sort();
    modes.dedup();
    let mut cg = Codegen::new();
    for mode in modes {
        cg.emit_mode(mode, catalog);
    }
    cg.into_string()
}

/// Everything, from the standard catalog.
pub fn render_all() -> String {
    let mut cg = Codegen::new();
    cg.emit(expand_smart_number_conversions());
    cg.emit(expand_operand_conversions());
    cg.emit(expand_node_conversions());
    cg.into_string()
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
