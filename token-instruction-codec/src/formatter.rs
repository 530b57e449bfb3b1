//! Human-readable rendering of decoded instructions and messages.
//!
//! Instructions render as a box-drawing tree:
//!
//! ```text
//! Program: TokenMetadata (metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s)
//! └─ Instruction: CreateMasterEditionV3
//!    ├─ Params
//!    │  └─ max_supply: <none>
//!    └─ Accounts[len=8]
//!       ├─ #0 edition: ... (writable)
//!       ...
//! ```

use solana_instruction::AccountMeta;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    config::{DecoderConfig, LogVerbosity},
    core::DecodedField,
    types::{known_program_name, AccountAccess, InstructionLog, TransactionLog},
};

/// ANSI escape sequences, or empty strings when colors are disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    pub reset: &'static str,
    pub bold: &'static str,
    pub dim: &'static str,
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub cyan: &'static str,
}

impl Colors {
    pub const fn ansi() -> Self {
        Self {
            reset: "\x1b[0m",
            bold: "\x1b[1m",
            dim: "\x1b[2m",
            red: "\x1b[31m",
            green: "\x1b[32m",
            yellow: "\x1b[33m",
            cyan: "\x1b[36m",
        }
    }

    pub const fn plain() -> Self {
        Self {
            reset: "",
            bold: "",
            dim: "",
            red: "",
            green: "",
            yellow: "",
            cyan: "",
        }
    }

    pub const fn new(enabled: bool) -> Self {
        if enabled {
            Self::ansi()
        } else {
            Self::plain()
        }
    }
}

/// Strip ANSI escape codes from text.
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until we find the terminating letter [A-Za-z]
            if chars.peek() == Some(&'[') {
                chars.next();
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

struct Node {
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn branch(label: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    fn write(&self, out: &mut String, prefix: &str) {
        out.push_str(&self.label);
        out.push('\n');
        write_children(&self.children, out, prefix);
    }
}

fn write_children(children: &[Node], out: &mut String, prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        out.push_str(prefix);
        out.push_str(if last { "└─ " } else { "├─ " });
        out.push_str(&child.label);
        out.push('\n');
        let nested = format!("{prefix}{}", if last { "   " } else { "│  " });
        write_children(&child.children, out, &nested);
    }
}

/// Renders one instruction as a tree.
#[derive(Debug, Clone)]
pub struct TreeFormatter {
    verbosity: LogVerbosity,
    colors: Colors,
}

impl TreeFormatter {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            verbosity: config.verbosity,
            colors: Colors::new(config.use_colors),
        }
    }

    pub fn format(&self, log: &InstructionLog) -> String {
        let mut out = String::new();
        self.program_node(log).write(&mut out, "");
        out
    }

    fn program_node(&self, log: &InstructionLog) -> Node {
        let c = &self.colors;
        Node::branch(
            format!(
                "{}Program:{} {}{}{} ({})",
                c.bold, c.reset, c.cyan, log.program_name, c.reset, log.program_id
            ),
            vec![self.instruction_node(log)],
        )
    }

    fn instruction_node(&self, log: &InstructionLog) -> Node {
        let c = &self.colors;
        let name = match (&log.instruction_name, &log.error) {
            (Some(name), _) => format!("{}{name}{}", c.green, c.reset),
            (None, Some(_)) => format!("{}<failed to decode>{}", c.red, c.reset),
            (None, None) => format!("{}<unknown>{}", c.yellow, c.reset),
        };
        let label = format!("{}Instruction:{} {name}", c.bold, c.reset);
        if self.verbosity == LogVerbosity::Brief {
            return Node::leaf(label);
        }

        let mut children = Vec::new();
        if self.verbosity == LogVerbosity::Detailed {
            children.push(Node::leaf(format!(
                "Data[len={}]: {}",
                log.data.len(),
                bs58::encode(&log.data).into_string()
            )));
        }
        if let Some(error) = &log.error {
            children.push(Node::leaf(format!("{}Error:{} {error}", c.red, c.reset)));
        }
        if let Some(decoded) = &log.decoded_instruction {
            if !decoded.fields.is_empty() {
                children.push(Node::branch(
                    "Params",
                    decoded.fields.iter().map(|f| self.field_node(f)).collect(),
                ));
            }
        }
        children.push(self.accounts_node(log));
        Node::branch(label, children)
    }

    fn field_node(&self, field: &DecodedField) -> Node {
        let label = if field.value.is_empty() {
            field.name.clone()
        } else {
            format!("{}: {}", field.name, field.value)
        };
        Node::branch(
            label,
            field.children.iter().map(|f| self.field_node(f)).collect(),
        )
    }

    fn accounts_node(&self, log: &InstructionLog) -> Node {
        let names = log.decoded_instruction.as_ref();
        Node::branch(
            format!("Accounts[len={}]", log.accounts.len()),
            log.accounts
                .iter()
                .enumerate()
                .map(|(i, meta)| {
                    self.account_node(i, names.and_then(|d| d.account_name(i)), meta)
                })
                .collect(),
        )
    }

    fn account_node(&self, index: usize, name: Option<&str>, meta: &AccountMeta) -> Node {
        let c = &self.colors;
        let access = AccountAccess::from_meta(meta).text();
        match name {
            Some(name) => Node::leaf(format!(
                "#{index} {name}: {} {}({access}){}",
                meta.pubkey, c.dim, c.reset
            )),
            None => Node::leaf(format!(
                "#{index}: {} {}({access}){}",
                meta.pubkey, c.dim, c.reset
            )),
        }
    }
}

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Pubkey")]
    pubkey: String,
    #[tabled(rename = "Access")]
    access: &'static str,
    #[tabled(rename = "Program")]
    program: String,
}

/// Renders a decoded message: header, account table and one tree per instruction.
#[derive(Debug, Clone)]
pub struct TransactionFormatter {
    config: DecoderConfig,
    tree: TreeFormatter,
}

impl TransactionFormatter {
    pub fn new(config: &DecoderConfig) -> Self {
        Self {
            config: config.clone(),
            tree: TreeFormatter::new(config),
        }
    }

    pub fn format(&self, log: &TransactionLog, tx_number: usize) -> String {
        let c = Colors::new(self.config.use_colors);
        let mut out = format!(
            "{}Transaction #{tx_number}{}\nSignature: {}\n",
            c.bold, c.reset, log.signature
        );

        if self.config.verbosity != LogVerbosity::Brief && !log.accounts.is_empty() {
            let registry = self.config.decoder_registry();
            let rows = log.accounts.iter().enumerate().map(|(index, account)| AccountRow {
                index,
                pubkey: account.pubkey.to_string(),
                access: account.access.text(),
                program: known_program_name(&account.pubkey, Some(&registry))
                    .unwrap_or_default(),
            });
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            out.push_str(&format!("Accounts[len={}]:\n{table}\n", log.accounts.len()));
        }

        out.push_str(&format!("Instructions[len={}]:\n", log.instructions.len()));
        for ix in &log.instructions {
            out.push_str(&format!("[{}] ", ix.index));
            out.push_str(&self.tree.format(ix));
        }
        out
    }
}
