// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::WorkspaceFixture;

use indoc::indoc;
use pretty_assertions::assert_eq;
use repo_sync::{
    document::Document,
    sync::{sync_golangci_lint, SyncError},
};
use sealed_test::prelude::*;
use std::env::current_dir;

#[sealed_test]
fn sync_template_with_and_without_override() -> anyhow::Result<()> {
    let fixture = WorkspaceFixture::new(current_dir()?)?;
    fixture.with_template(indoc! {r#"
        linters:
          enable:
            - govet
    "#})?;
    fixture.add_repo("a", None)?;
    fixture.add_repo(
        "b",
        Some(indoc! {r#"
            linters:
              enable:
                - staticcheck
        "#}),
    )?;

    let outcomes = sync_golangci_lint(fixture.store())?;
    let overridden = outcomes.iter().map(|o| o.overridden).collect::<Vec<_>>();
    assert_eq!(overridden, vec![false, true]);

    let result: Document = fixture.read_output("a")?.parse()?;
    let expect: Document = "linters: {enable: [govet]}".parse()?;
    assert_eq!(result, expect);

    let result = fixture.read_output("b")?;
    let expect = indoc! {r#"
        linters:
          enable:
          - govet
          - staticcheck
    "#};
    assert_eq!(result, expect);

    Ok(())
}

#[sealed_test]
fn sync_does_not_leak_overrides_between_repos() -> anyhow::Result<()> {
    let fixture = WorkspaceFixture::new(current_dir()?)?;
    fixture.with_template("linters: {enable: [govet]}\nrun: {timeout: 5m}\n")?;
    fixture.add_repo("a", Some("linters: {enable: [staticcheck]}\n"))?;
    fixture.add_repo("b", Some("run: {timeout: 10m}\n"))?;
    fixture.add_repo("c", None)?;

    sync_golangci_lint(fixture.store())?;

    let result: Document = fixture.read_output("a")?.parse()?;
    let expect: Document = "linters: {enable: [govet, staticcheck]}\nrun: {timeout: 5m}".parse()?;
    assert_eq!(result, expect);

    let result: Document = fixture.read_output("b")?.parse()?;
    let expect: Document = "linters: {enable: [govet]}\nrun: {timeout: 10m}".parse()?;
    assert_eq!(result, expect);

    let result: Document = fixture.read_output("c")?.parse()?;
    let expect: Document = "linters: {enable: [govet]}\nrun: {timeout: 5m}".parse()?;
    assert_eq!(result, expect);

    Ok(())
}

#[sealed_test]
fn sync_is_repeatable() -> anyhow::Result<()> {
    let fixture = WorkspaceFixture::new(current_dir()?)?;
    fixture.with_template("linters: {enable: [govet]}\n")?;
    fixture.add_repo("a", Some("linters: {enable: [staticcheck]}\n"))?;

    sync_golangci_lint(fixture.store())?;
    let first = fixture.read_output("a")?;
    sync_golangci_lint(fixture.store())?;
    let second = fixture.read_output("a")?;

    assert_eq!(first, second);

    Ok(())
}

#[sealed_test]
fn sync_without_template_fails_early() -> anyhow::Result<()> {
    let fixture = WorkspaceFixture::new(current_dir()?)?;
    fixture.add_repo("a", None)?;

    let result = sync_golangci_lint(fixture.store());
    assert!(matches!(result, Err(SyncError::TemplateMissing { .. })));
    assert!(!fixture.repo_path("a").join(".golangci.yml").exists());

    Ok(())
}

#[sealed_test]
fn sync_with_no_repos() -> anyhow::Result<()> {
    let fixture = WorkspaceFixture::new(current_dir()?)?;
    fixture.with_template("linters: {enable: [govet]}\n")?;

    let outcomes = sync_golangci_lint(fixture.store())?;
    assert!(outcomes.is_empty());

    Ok(())
}
