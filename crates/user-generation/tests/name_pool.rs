//! Integration tests for loading name pools from locale directories.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

mod test_support;

use camino::Utf8PathBuf;
use rstest::rstest;
use test_support::{unique_names_root, write_locale};
use user_generation::{DataSourceError, GenderMix, NamePools, PoolKind};

fn root_with(files: &[(&str, &str)]) -> Utf8PathBuf {
    let root = unique_names_root("pools").expect("temp names root");
    write_locale(&root, "xx", files).expect("write locale");
    root
}

#[test]
fn loads_all_three_pools() {
    let root = root_with(&[
        ("family.txt", "Smith\nJones\n"),
        ("female.txt", "Ana\nMia\n"),
        ("male.txt", "Tom\n"),
    ]);

    let pools = NamePools::load(&root, "xx", GenderMix::Both).expect("pools load");

    assert_eq!(pools.family().names(), ["Smith", "Jones"]);
    assert_eq!(pools.female().map(|pool| pool.len().get()), Some(2));
    assert_eq!(pools.male().map(|pool| pool.len().get()), Some(1));
}

#[test]
fn missing_file_of_a_disabled_gender_is_ignored() {
    let root = root_with(&[("family.txt", "Smith\n"), ("male.txt", "Tom\n")]);

    let pools = NamePools::load(&root, "xx", GenderMix::MaleOnly).expect("pools load");

    assert!(pools.female().is_none());
    assert!(pools.male().is_some());
}

#[rstest]
#[case(GenderMix::Both, PoolKind::Female)]
#[case(GenderMix::FemaleOnly, PoolKind::Female)]
fn missing_file_of_an_enabled_gender_fails(#[case] mix: GenderMix, #[case] expected: PoolKind) {
    let root = root_with(&[("family.txt", "Smith\n"), ("male.txt", "Tom\n")]);

    let err = NamePools::load(&root, "xx", mix).expect_err("female pool missing");

    assert!(
        matches!(err, DataSourceError::Unreadable { kind, .. } if kind == expected),
        "unexpected error: {err:?}"
    );
}

#[test]
fn missing_family_file_fails_even_without_given_names() {
    let root = root_with(&[("female.txt", "Ana\n")]);

    let err = NamePools::load(&root, "xx", GenderMix::Neither).expect_err("family missing");

    assert!(matches!(
        err,
        DataSourceError::Unreadable {
            kind: PoolKind::Family,
            ..
        }
    ));
}

#[test]
fn blank_pool_of_an_enabled_gender_is_empty() {
    let root = root_with(&[
        ("family.txt", "Smith\n"),
        ("female.txt", "\n \n"),
        ("male.txt", "Tom\n"),
    ]);

    let err = NamePools::load(&root, "xx", GenderMix::Both).expect_err("empty pool");

    assert!(matches!(
        err,
        DataSourceError::EmptyPool {
            kind: PoolKind::Female,
            ..
        }
    ));
}

#[test]
fn non_utf8_names_are_unreadable() {
    let root = unique_names_root("pools").expect("temp names root");
    write_locale(&root, "xx", &[("female.txt", "Ana\n"), ("male.txt", "Tom\n")])
        .expect("write locale");
    let dir = cap_std::fs::Dir::open_ambient_dir(root.join("xx"), cap_std::ambient_authority())
        .expect("open locale");
    dir.write("family.txt", [0xff_u8, 0xfe, b'\n']).expect("write bytes");

    let err = NamePools::load(&root, "xx", GenderMix::Both).expect_err("invalid utf-8");

    assert!(matches!(
        err,
        DataSourceError::Unreadable {
            kind: PoolKind::Family,
            ..
        }
    ));
}

#[rstest]
#[case("")]
#[case("..")]
#[case("en/../hu")]
#[case("/etc")]
fn malformed_locales_are_rejected(#[case] locale: &str) {
    let root = root_with(&[("family.txt", "Smith\n")]);

    let err = NamePools::load(&root, locale, GenderMix::Neither).expect_err("invalid locale");

    assert_eq!(
        err,
        DataSourceError::InvalidLocale {
            locale: locale.to_owned()
        }
    );
}
