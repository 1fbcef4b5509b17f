//! End-to-end reification against the real filesystem and the in-memory one.

mod common;

use std::fs;
use std::path::Path;

use archetype_adapters::{MemoryFilesystem, TagRenderer, local_reifier};
use archetype_core::prelude::*;
use common::*;

#[test]
fn reproduces_static_tree_and_renders_templates() {
    let ws = Workspace::new();
    let archetype = ws.full_archetype();
    let target = ws.path("out");

    let report = local_reifier()
        .reify(
            &archetype,
            &ReificationRequest::new(&target).with_metadata(yogi()),
        )
        .unwrap();

    assert_tree(&target, STATIC_FILES);
    assert_tree(&target, RENDERED_FILES);
    assert_eq!(report.directories_ensured, 2);
    assert_eq!(report.files_copied, STATIC_FILES.len());
    assert_eq!(report.templates_rendered, TEMPLATE_FILES.len());
    assert!(report.collisions.is_empty());
}

#[test]
fn static_files_are_never_evaluated() {
    let ws = Workspace::new();
    let archetype = ws.full_archetype();
    let target = ws.path("out");

    local_reifier()
        .reify(&archetype, &ReificationRequest::new(&target))
        .unwrap_err();

    // Templates fail without metadata; the static copy still holds the raw tag.
    assert_eq!(read(&target, "fakeTemplate.txt"), "Hello, <%= name %>!");
}

#[test]
fn existing_target_keeps_unrelated_files() {
    let ws = Workspace::new();
    let archetype = ws.full_archetype();
    let target = ws.path("existing");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("Original.txt"), "Original").unwrap();
    fs::write(target.join("alpha.txt"), "<stale>").unwrap();
    fs::write(target.join("omicron.txt"), "<stale>").unwrap();

    local_reifier()
        .reify(
            &archetype,
            &ReificationRequest::new(&target).with_metadata(yogi()),
        )
        .unwrap();

    assert_eq!(read(&target, "Original.txt"), "Original");
    assert_eq!(read(&target, "alpha.txt"), "Alpha");
    assert_eq!(read(&target, "omicron.txt"), "Hello, Yogi!");
}

#[test]
fn static_only_archetype() {
    let ws = Workspace::new();
    let archetype = ws.archetype(
        "static-only",
        &[("justStatic.txt", "This is a static-only example!")],
        &[],
    );
    let target = ws.path("out");

    let report = local_reifier()
        .reify(&archetype, &ReificationRequest::new(&target))
        .unwrap();

    assert_eq!(read(&target, "justStatic.txt"), "This is a static-only example!");
    assert_eq!(report.templates_rendered, 0);
    assert_eq!(fs::read_dir(&target).unwrap().count(), 1);
}

#[test]
fn template_only_archetype() {
    let ws = Workspace::new();
    let archetype = ws.archetype(
        "template-only",
        &[],
        &[(
            "justTemplate.txt",
            "This bear is <%= name %>; he is <%= age %> years old.",
        )],
    );
    let target = ws.path("out");

    let report = local_reifier()
        .reify(
            &archetype,
            &ReificationRequest::new(&target).with_metadata(yogi()),
        )
        .unwrap();

    assert_eq!(
        read(&target, "justTemplate.txt"),
        "This bear is Yogi; he is 36 years old."
    );
    assert_eq!(report.files_copied, 0);
    assert_eq!(report.templates_rendered, 1);
    assert_eq!(fs::read_dir(&target).unwrap().count(), 1);
}

#[test]
fn archetype_without_subtrees_creates_only_the_target() {
    let ws = Workspace::new();
    let archetype = ws.archetype("empty", &[], &[]);
    let target = ws.path("deep/nested/out");

    let report = local_reifier()
        .reify(&archetype, &ReificationRequest::new(&target))
        .unwrap();

    assert!(target.is_dir());
    assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    assert_eq!(report, ReificationReport::default());
}

#[test]
fn missing_source_writes_nothing() {
    let ws = Workspace::new();
    let archetype = Archetype::new(ws.path("<INEXISTING>"));
    let target = ws.path("out");

    let err = local_reifier()
        .reify(
            &archetype,
            &ReificationRequest::new(&target).with_metadata(yogi()),
        )
        .unwrap_err();

    assert!(matches!(err, ReifyError::SourceNotFound { .. }));
    assert!(
        err.to_string()
            .contains("The source directory does not exist")
    );
    assert!(!target.exists());
}

#[test]
fn source_that_is_a_file_is_not_an_archetype() {
    let ws = Workspace::new();
    fs::write(ws.path("not-a-dir"), "x").unwrap();

    let err = local_reifier()
        .reify(
            &Archetype::new(ws.path("not-a-dir")),
            &ReificationRequest::new(ws.path("out")),
        )
        .unwrap_err();

    assert!(matches!(err, ReifyError::SourceNotFound { .. }));
}

#[test]
fn target_below_a_file_is_unwritable() {
    let ws = Workspace::new();
    let archetype = ws.full_archetype();
    fs::write(ws.path("blocker"), "x").unwrap();

    let err = local_reifier()
        .reify(
            &archetype,
            &ReificationRequest::new(ws.path("blocker/out")).with_metadata(yogi()),
        )
        .unwrap_err();

    assert!(matches!(err, ReifyError::TargetUnwritable { .. }));
    assert_eq!(err.stage(), ReificationState::Bootstrapping);
}

#[test]
fn template_wins_a_collision() {
    let ws = Workspace::new();
    let archetype = ws.archetype(
        "colliding",
        &[("omicron.txt", "static copy"), ("alpha.txt", "Alpha")],
        &[("omicron.txt", "Hello, <%= name %>!")],
    );
    let target = ws.path("out");

    let report = local_reifier()
        .reify(
            &archetype,
            &ReificationRequest::new(&target).with_metadata(yogi()),
        )
        .unwrap();

    assert_eq!(read(&target, "omicron.txt"), "Hello, Yogi!");
    assert_eq!(read(&target, "alpha.txt"), "Alpha");
    assert_eq!(
        report.collisions,
        vec![RelativePath::try_new("omicron.txt").unwrap()]
    );
    assert_eq!(report.files_copied, 1);
}

#[test]
fn undefined_reference_fails_but_siblings_complete() {
    let ws = Workspace::new();
    let archetype = ws.archetype(
        "partial",
        &[("alpha.txt", "Alpha")],
        &[
            ("omicron.txt", "Hello, <%= name %>!"),
            ("ro/sigma.txt", "<%= nickname %> is a bear."),
        ],
    );
    let target = ws.path("out");

    let err = local_reifier()
        .reify(
            &archetype,
            &ReificationRequest::new(&target).with_metadata(yogi()),
        )
        .unwrap_err();

    match &err {
        ReifyError::TemplateRender { path, cause } => {
            assert_eq!(path.to_string(), "ro/sigma.txt");
            assert!(matches!(cause, RenderFailure::UndefinedReference(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(read(&target, "alpha.txt"), "Alpha");
    assert_eq!(read(&target, "omicron.txt"), "Hello, Yogi!");
    assert!(!target.join("ro/sigma.txt").exists());
}

#[test]
fn syntax_error_reports_position() {
    let ws = Workspace::new();
    let archetype = ws.archetype("broken", &[], &[("bad.txt", "ok\n<% if (name) { %>")]);

    let err = local_reifier()
        .reify(
            &archetype,
            &ReificationRequest::new(ws.path("out")).with_metadata(yogi()),
        )
        .unwrap_err();

    let ReifyError::TemplateRender {
        cause: RenderFailure::Syntax(TemplateError::Syntax { line, column, .. }),
        ..
    } = err
    else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!((line, column), (2, 1));
}

#[test]
fn latin1_templates_round_trip() {
    let ws = Workspace::new();
    let archetype = ws.archetype("latin1", &[], &[]);
    let templates = archetype.template_root();
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("menu.txt"), b"Caf\xe9 <%= name %>").unwrap();
    let target = ws.path("out");

    local_reifier()
        .reify(
            &archetype,
            &ReificationRequest::new(&target)
                .with_metadata(Metadata::new().with("name", "Jos\u{e9}"))
                .with_encoding(Encoding::Latin1),
        )
        .unwrap();

    assert_eq!(
        fs::read(target.join("menu.txt")).unwrap(),
        b"Caf\xe9 Jos\xe9".to_vec()
    );
}

#[test]
fn invalid_utf8_template_fails_to_decode() {
    let ws = Workspace::new();
    let archetype = ws.archetype("bytes", &[], &[]);
    let templates = archetype.template_root();
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("menu.txt"), b"Caf\xe9").unwrap();

    let err = local_reifier()
        .reify(&archetype, &ReificationRequest::new(ws.path("out")))
        .unwrap_err();

    assert!(matches!(
        err,
        ReifyError::TemplateRender {
            cause: RenderFailure::Decode(_),
            ..
        }
    ));
}

#[test]
fn rerunning_produces_the_same_tree() {
    let ws = Workspace::new();
    let archetype = ws.full_archetype();
    let target = ws.path("out");
    let request = ReificationRequest::new(&target).with_metadata(yogi());
    let reifier = local_reifier().with_workers(2);

    let first = archetype.reify(&reifier, &request).unwrap();
    let second = archetype.reify(&reifier, &request).unwrap();

    assert_eq!(first, second);
    assert_tree(&target, STATIC_FILES);
    assert_tree(&target, RENDERED_FILES);
}

#[test]
fn plan_lists_work_without_writing() {
    let ws = Workspace::new();
    let archetype = ws.full_archetype();

    let plan = local_reifier().plan(&archetype).unwrap();

    assert_eq!(plan.static_files.len(), STATIC_FILES.len());
    assert_eq!(plan.template_files.len(), TEMPLATE_FILES.len());
    assert_eq!(plan.file_count(), STATIC_FILES.len() + TEMPLATE_FILES.len());
    assert!(!ws.path("out").exists());
}

// ----------------------------------------------------------------------------
// In-memory filesystem
// ----------------------------------------------------------------------------

fn memory_archetype() -> MemoryFilesystem {
    let memory = MemoryFilesystem::new();
    for (relative, contents) in STATIC_FILES {
        memory.add_file(Path::new("a/static").join(relative), contents);
    }
    for (relative, contents) in TEMPLATE_FILES {
        memory.add_file(Path::new("a/templates").join(relative), contents);
    }
    memory
}

#[test]
fn memory_filesystem_reification() {
    let memory = memory_archetype();
    let reifier = Reifier::new(Box::new(memory.clone()), Box::new(TagRenderer::new()));

    reifier
        .reify(
            &Archetype::new("a"),
            &ReificationRequest::new("out").with_metadata(yogi()),
        )
        .unwrap();

    for (relative, expected) in STATIC_FILES.iter().chain(RENDERED_FILES) {
        assert_eq!(
            memory.read_text(Path::new("out").join(relative)).as_deref(),
            Some(*expected),
            "content of {relative}"
        );
    }
}

#[test]
fn failed_subtree_leaves_other_writes_in_place() {
    let memory = memory_archetype();
    memory.fail_writes_under("out/ro");
    let reifier = Reifier::new(Box::new(memory.clone()), Box::new(TagRenderer::new())).with_workers(4);

    let err = reifier
        .reify(
            &Archetype::new("a"),
            &ReificationRequest::new("out").with_metadata(yogi()),
        )
        .unwrap_err();

    let ReifyError::TemplateRender { path, cause } = err else {
        panic!("expected a template failure");
    };
    assert!(path.as_path().starts_with("ro"));
    assert!(matches!(cause, RenderFailure::Write(_)));

    assert_eq!(memory.read_text("out/alpha.txt").as_deref(), Some("Alpha"));
    assert_eq!(memory.read_text("out/omicron.txt").as_deref(), Some("Hello, Yogi!"));
    assert!(memory.read_file("out/ro/sigma.txt").is_none());
}

#[test]
fn failed_static_copy_lets_templates_complete() {
    let memory = memory_archetype();
    memory.fail_writes_under("out/gamma");
    let reifier = Reifier::new(Box::new(memory.clone()), Box::new(TagRenderer::new())).with_workers(4);

    let err = reifier
        .reify(
            &Archetype::new("a"),
            &ReificationRequest::new("out").with_metadata(yogi()),
        )
        .unwrap_err();

    let ReifyError::Copy { from, path, .. } = err else {
        panic!("expected a static copy failure");
    };
    assert!(from.starts_with("a/static/gamma"));
    assert!(path.starts_with("out/gamma"));

    for (relative, expected) in RENDERED_FILES {
        assert_eq!(
            memory.read_text(Path::new("out").join(relative)).as_deref(),
            Some(*expected),
            "content of {relative}"
        );
    }
    assert_eq!(memory.read_text("out/alpha.txt").as_deref(), Some("Alpha"));
    assert!(memory.read_file("out/gamma/delta.txt").is_none());
}

#[test]
fn static_subtree_that_is_a_file_is_rejected() {
    let memory = MemoryFilesystem::new()
        .with_file("a/static", "not a directory")
        .with_file("a/templates/omicron.txt", "Hello, <%= name %>!");
    let reifier = Reifier::new(Box::new(memory.clone()), Box::new(TagRenderer::new()));

    let err = reifier
        .reify(
            &Archetype::new("a"),
            &ReificationRequest::new("out").with_metadata(yogi()),
        )
        .unwrap_err();

    assert!(matches!(err, ReifyError::Discover { ref root, .. } if root == Path::new("a/static")));
    assert_eq!(err.to_string(), "Cannot list archetype subtree 'a/static'");
    assert!(
        memory.list_files().iter().all(|file| !file.starts_with("out")),
        "nothing rendered after a discovery failure"
    );
}

#[test]
fn missing_source_makes_no_filesystem_changes() {
    let memory = MemoryFilesystem::new();
    let reifier = Reifier::new(Box::new(memory.clone()), Box::new(TagRenderer::new()));

    let err = reifier
        .reify(&Archetype::new("nowhere"), &ReificationRequest::new("out"))
        .unwrap_err();

    assert!(matches!(err, ReifyError::SourceNotFound { .. }));
    assert_eq!(memory.mutations(), 0);
}
