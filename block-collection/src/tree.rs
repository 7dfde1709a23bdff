use serde::Deserialize;
use serde::Serialize;

const INDENT: &str = "    ";
const FILE_MARKER: &str = "├── ";

/// A block's source tree as fetched from the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockNode {
    Folder {
        name: String,
        path: String,
        children: Vec<BlockNode>,
    },
    File {
        name: String,
        path: String,
        content: String,
    },
}

impl BlockNode {
    pub fn name(&self) -> &str {
        match self {
            BlockNode::Folder { name, .. } | BlockNode::File { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            BlockNode::Folder { path, .. } | BlockNode::File { path, .. } => path,
        }
    }
}

/// A flattened source file, ready to be streamed or handed to the create
/// command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFile {
    pub name: String,
    pub path: String,
    pub content: String,
    #[serde(rename = "type")]
    pub language: String,
}

/// Code-fence language for a block source file.
pub fn language_for(file_name: &str) -> &'static str {
    if file_name.ends_with(".js") {
        "javascript"
    } else {
        "css"
    }
}

/// Indented tree: the root name, then every descendant on its own line.
pub fn render_file_tree(root: &BlockNode) -> String {
    let mut out = String::new();
    out.push_str(root.name());
    out.push('\n');
    if let BlockNode::Folder { children, .. } = root {
        for child in children {
            push_tree_line(child, 1, &mut out);
        }
    }
    out
}

fn push_tree_line(node: &BlockNode, depth: usize, out: &mut String) {
    out.push_str(&INDENT.repeat(depth));
    match node {
        BlockNode::File { name, .. } => {
            out.push_str(FILE_MARKER);
            out.push_str(name);
            out.push('\n');
        }
        BlockNode::Folder { name, children, .. } => {
            out.push_str(name);
            out.push('\n');
            for child in children {
                push_tree_line(child, depth + 1, out);
            }
        }
    }
}

/// Depth-first list of every file under `root`.
pub fn collect_files(root: &BlockNode) -> Vec<BlockFile> {
    let mut files = Vec::new();
    collect_into(root, &mut files);
    files
}

fn collect_into(node: &BlockNode, files: &mut Vec<BlockFile>) {
    match node {
        BlockNode::File {
            name,
            path,
            content,
        } => files.push(BlockFile {
            name: name.clone(),
            path: path.clone(),
            content: content.clone(),
            language: language_for(name).to_string(),
        }),
        BlockNode::Folder { children, .. } => {
            for child in children {
                collect_into(child, files);
            }
        }
    }
}
