//! Archetype fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use archetype_core::prelude::*;
use tempfile::TempDir;

pub const STATIC_FILES: &[(&str, &str)] = &[
    ("alpha.txt", "Alpha"),
    ("beta.md", "Beta\nBeta 2\n"),
    (".alphaDot.txt", "AlphaDot --> 90"),
    ("gamma/delta.txt", "Delta"),
    ("gamma/epsilon/zeta.md", "Zeta\nEta\nTheta\n"),
    ("gamma/epsilon/.zetaDot", "Zeta --> 92"),
    // Template syntax in a static file must never be evaluated.
    ("fakeTemplate.txt", "Hello, <%= name %>!"),
];

pub const TEMPLATE_FILES: &[(&str, &str)] = &[
    ("omicron.txt", "Hello, <%= name %>!"),
    (
        "pi.md",
        "<%= name %> is a bear.\n\n<%= name %> is <%= age %> years old.\n",
    ),
    (
        ".omicronDot.txt",
        "This is <%= name %>. <%= name %> is a <%= age %>-year-old bear.",
    ),
    ("ro/sigma.txt", "<%= name %> is a bear living in a park."),
    ("ro/tau/omega.md", "<%= name %> --- <%= age %>\n"),
    ("ro/tau/.omegaDot", "Name: <%= name %>\nAge: <%= age %>\n"),
];

pub const RENDERED_FILES: &[(&str, &str)] = &[
    ("omicron.txt", "Hello, Yogi!"),
    ("pi.md", "Yogi is a bear.\n\nYogi is 36 years old.\n"),
    (".omicronDot.txt", "This is Yogi. Yogi is a 36-year-old bear."),
    ("ro/sigma.txt", "Yogi is a bear living in a park."),
    ("ro/tau/omega.md", "Yogi --- 36\n"),
    ("ro/tau/.omegaDot", "Name: Yogi\nAge: 36\n"),
];

/// A scratch directory holding archetypes and targets.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write an archetype named `name` with the given static and template files.
    pub fn archetype(
        &self,
        name: &str,
        static_files: &[(&str, &str)],
        template_files: &[(&str, &str)],
    ) -> Archetype {
        let root = self.path(name);
        fs::create_dir_all(&root).expect("create archetype root");
        write_tree(&root.join(ArchetypeLayout::STATIC_DIR), static_files);
        write_tree(&root.join(ArchetypeLayout::TEMPLATES_DIR), template_files);
        Archetype::new(root)
    }

    /// The full fixture: every static file and every template.
    pub fn full_archetype(&self) -> Archetype {
        self.archetype("full", STATIC_FILES, TEMPLATE_FILES)
    }
}

pub fn yogi() -> Metadata {
    Metadata::new().with("name", "Yogi").with("age", 36)
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("read {relative}: {e}"))
}

pub fn assert_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, expected) in files {
        assert_eq!(&read(root, relative), expected, "content of {relative}");
    }
}

fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("file has a parent")).expect("create parent");
        fs::write(&path, contents).expect("write fixture file");
    }
}
