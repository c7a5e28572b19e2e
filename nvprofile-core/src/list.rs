use crate::descriptor::{DESCRIPTOR_NAME, ProfileDescriptor};
use crate::error::Result;
use crate::read::archive::Opened;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeNode {
    Dir(DirNode),
    File,
}

/// Children keyed by name, so iteration is always sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirNode {
    pub children: BTreeMap<String, TreeNode>,
}

impl DirNode {
    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.get(name)
    }

    pub fn dir(&self, name: &str) -> Option<&DirNode> {
        match self.children.get(name) {
            Some(TreeNode::Dir(d)) => Some(d),
            _ => None,
        }
    }
}

/// Hierarchical view of an archive's content entries. Directories are synthesized from the
/// `/`-separated names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingTree {
    pub root: DirNode,
}

impl ListingTree {
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tree = Self::default();
        for n in names {
            tree.insert(n);
        }
        tree
    }

    /// Adds one entry name. Empty segments are ignored; a trailing `/` adds a directory.
    /// A name that is both a file and a prefix of other names is shown as a directory.
    pub fn insert(&mut self, name: &str) {
        let is_dir = name.ends_with('/');
        let parts: Vec<&str> = name.split('/').filter(|p| !p.is_empty()).collect();
        let Some((last, dirs)) = parts.split_last() else {
            return;
        };

        let mut cur = &mut self.root;
        for part in dirs {
            let node = cur
                .children
                .entry((*part).to_string())
                .or_insert_with(|| TreeNode::Dir(DirNode::default()));
            if matches!(node, TreeNode::File) {
                *node = TreeNode::Dir(DirNode::default());
            }
            cur = match node {
                TreeNode::Dir(d) => d,
                TreeNode::File => unreachable!("file nodes were upgraded above"),
            };
        }

        let leaf = if is_dir {
            TreeNode::Dir(DirNode::default())
        } else {
            TreeNode::File
        };
        cur.children.entry((*last).to_string()).or_insert(leaf);
    }

    pub fn root(&self) -> &DirNode {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn file_count(&self) -> usize {
        fn walk(d: &DirNode) -> usize {
            d.children
                .values()
                .map(|n| match n {
                    TreeNode::File => 1,
                    TreeNode::Dir(sub) => walk(sub),
                })
                .sum()
        }
        walk(&self.root)
    }

    /// All file leaves as `/`-joined paths, in tree order.
    pub fn file_paths(&self) -> Vec<String> {
        fn walk(d: &DirNode, prefix: &str, out: &mut Vec<String>) {
            for (name, node) in &d.children {
                let p = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                };
                match node {
                    TreeNode::File => out.push(p),
                    TreeNode::Dir(sub) => walk(sub, &p, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.root, "", &mut out);
        out
    }

    /// Indented text rendering, two spaces per level, directories suffixed with `/`.
    pub fn render(&self) -> String {
        fn walk(d: &DirNode, depth: usize, out: &mut String) {
            for (name, node) in &d.children {
                out.push_str(&"  ".repeat(depth));
                out.push_str(name);
                match node {
                    TreeNode::File => out.push('\n'),
                    TreeNode::Dir(sub) => {
                        out.push_str("/\n");
                        walk(sub, depth + 1, out);
                    }
                }
            }
        }
        let mut out = String::new();
        walk(&self.root, 0, &mut out);
        out
    }
}

#[derive(Clone, Debug)]
pub struct Inspection {
    pub descriptor: ProfileDescriptor,
    pub tree: ListingTree,
}

/// Reads the descriptor and builds the content tree. Opens the archive read-only.
pub fn inspect(archive: &Path) -> Result<Inspection> {
    let mut opened = Opened::open(archive)?;
    let descriptor = opened.descriptor()?;
    let names = opened.entry_names()?;
    let tree = ListingTree::from_names(
        names
            .iter()
            .map(String::as_str)
            .filter(|n| *n != DESCRIPTOR_NAME),
    );
    debug!(archive = %archive.display(), files = tree.file_count(), "inspected");
    Ok(Inspection { descriptor, tree })
}

/// Raw entry names in archive order, descriptor included.
pub fn list(archive: &Path) -> Result<Vec<String>> {
    Opened::open(archive)?.entry_names()
}
