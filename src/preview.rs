use crate::scaffold::{EntryReport, Outcome};
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Represents a node in the tree (either file or directory).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    is_file: bool,
    is_new: bool,
    /// Set once the node has its own planned entry, whose outcome wins over
    /// anything inferred from descendants.
    reported: bool,
}
impl TreeNode {
    fn new(name: String, is_file: bool, is_new: bool) -> Self {
        Self {
            name,
            children: Vec::new(),
            is_file,
            is_new,
            reported: false,
        }
    }
}

type Lookup = HashMap<PathBuf, Rc<RefCell<TreeNode>>>;

/// Finds the node for `path`, creating directory nodes for it and any missing
/// ancestor on the way. Implicit directories are new only if a descendant is.
fn node_for(lookup: &mut Lookup, path: &Path, is_new: bool) -> Rc<RefCell<TreeNode>> {
    if let Some(node) = lookup.get(path) {
        let mut existing = node.borrow_mut();
        if is_new && !existing.reported {
            existing.is_new = true;
        }
        drop(existing);
        return Rc::clone(node);
    }

    let parent = node_for(lookup, path.parent().unwrap_or(Path::new("")), is_new);

    let name = path
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let node = Rc::new(RefCell::new(TreeNode::new(name, false, is_new)));
    parent.borrow_mut().children.push(Rc::clone(&node));
    lookup.insert(path.to_path_buf(), Rc::clone(&node));

    node
}

/// Build the directory tree from planned entries, returning the root node.
fn build_tree(reports: &[EntryReport], base: &Path) -> Rc<RefCell<TreeNode>> {
    let root_name = base
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| base.display().to_string());

    let root = Rc::new(RefCell::new(TreeNode::new(root_name, false, false)));

    // relative paths keyed from the root, which is the empty path
    let mut lookup: Lookup = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root));

    for report in reports {
        let relative = report.path.strip_prefix(base).unwrap_or(&report.path);
        let is_new = report.outcome == Outcome::Created;

        let node = node_for(&mut lookup, relative, is_new);
        let mut node = node.borrow_mut();
        node.is_file = report.kind.is_file();
        node.is_new = is_new;
        node.reported = true;
    }

    root
}

fn render_node(out: &mut String, node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool) {
    let node_borrow = node.borrow();

    let connector = if is_last { "└── " } else { "├── " };
    let name = match (node_borrow.is_file, node_borrow.is_new) {
        (true, true) => node_borrow.name.green(),
        (false, true) => node_borrow.name.blue(),
        (_, false) => node_borrow.name.dimmed(),
    };
    let _ = writeln!(out, "{}{}{}", prefix.yellow(), connector.yellow(), name);

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        render_node(out, child, &child_prefix, i == len - 1);
    }
}

/// Renders planned entries below `base` as an ASCII tree.
pub fn render_tree(reports: &[EntryReport], base: &Path) -> String {
    let mut out = String::new();

    render_node(&mut out, &build_tree(reports, base), "", true);

    out
}

pub fn preview_as_tree(reports: &[EntryReport], base: &Path) {
    println!(
        "Legend: {} = (new directory), {} = (new file), {} = (already present)",
        "blue".blue(),
        "green".green(),
        "dimmed".dimmed()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    print!("{}", render_tree(reports, base));

    let pending = reports.iter().filter(|r| r.created()).count();

    println!(
        "\n{} {}\n",
        "└─".bold().bright_blue(),
        format!("{} of {} entries to create", pending, reports.len()).bright_green()
    );
}
