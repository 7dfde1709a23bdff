use serde::Deserialize;
use serde::Serialize;
use std::fmt::Write as _;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    /// Code-fence language (`javascript`, `css`)
    #[serde(rename = "type")]
    pub language: String,
    pub path: String,
    pub content: String,
}

/// A block generated by the model: folder layout, file sources and an
/// optional authoring table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub tree: TemplateNode,
    pub files: Vec<TemplateFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mdtable: Option<String>,
}

/// Markdown answer describing how to lay out and fill a generated block.
pub fn render_block_markdown(template: &BlockTemplate) -> String {
    let mut out =
        String::from("For Creating a block structure, the folder/file structure is as follows:\n\n");
    out.push_str("```\n");
    push_node(&template.tree, 0, &mut out);
    out.push_str("```\n\nFile Content of each files are as follows:\n\n");

    for file in &template.files {
        let _ = write!(
            out,
            "## {}\n```{}\n{}\n```\n",
            file.path,
            file.language,
            file.content.trim_matches('\n')
        );
    }

    if let Some(table) = template
        .mdtable
        .as_deref()
        .map(str::trim)
        .filter(|table| !table.is_empty())
    {
        let _ = write!(out, "\nCorresponding table for the block:\n\n{table}\n");
    }
    out
}

fn push_node(node: &TemplateNode, depth: usize, out: &mut String) {
    out.push_str(&INDENT.repeat(depth));
    match node.kind {
        NodeKind::Directory => {
            out.push_str(&node.name);
            out.push('\n');
            for child in &node.children {
                push_node(child, depth + 1, out);
            }
        }
        NodeKind::File => {
            out.push_str("├── ");
            out.push_str(&node.name);
            out.push('\n');
        }
    }
}
