//! SQL dump loading and post-seed statements against a recording database.

#![allow(clippy::unwrap_used)]

use oc_install_cli::commands::seed::{apply_fixups, load_dump, seed_database};
use oc_install_cli::error::InstallError;
use oc_install_core::seed::fixups::{RELAX_SQL_MODE, SET_CHARSET};
use oc_install_integration_tests::{RecordingDatabase, sample_options, write_dump};
use secrecy::ExposeSecret;

const DUMP: &str = "\
-- OpenCart SQL dump
SET sql_mode = '';

DROP TABLE IF EXISTS `oc_country`;
CREATE TABLE `oc_country` (
  `country_id` int(11) NOT NULL AUTO_INCREMENT,
  PRIMARY KEY (`country_id`)
);

INSERT INTO `oc_country` (`country_id`, `name`) VALUES
(1, 'Afghanistan'),
(2, 'Albania');

INSERT INTO `oc_currency` (`currency_id`, `code`) VALUES (1, 'GBP');
INSERT INTO `oc_setting` (`key`, `value`) VALUES
('config_name', 'Your Store');
";

fn dump_file(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("opencart.sql");
    write_dump(&path, contents);
    (dir, path)
}

#[tokio::test]
async fn executes_every_block_in_file_order() {
    let (_dir, path) = dump_file(DUMP);
    let mut db = RecordingDatabase::new();

    let summary = load_dump(&mut db, &path, "oc_").await.unwrap();

    assert_eq!(summary.statements, 3);
    assert_eq!(summary.abandoned, 0);
    assert!(!summary.unterminated);
    assert_eq!(
        db.statements(),
        [
            "INSERT INTO `oc_country` (`country_id`, `name`) VALUES\n(1, 'Afghanistan'),\n(2, 'Albania');\n",
            "INSERT INTO `oc_currency` (`currency_id`, `code`) VALUES (1, 'GBP');\n",
            "INSERT INTO `oc_setting` (`key`, `value`) VALUES\n('config_name', 'Your Store');\n",
        ]
    );
}

#[tokio::test]
async fn rewrites_table_prefix() {
    let (_dir, path) = dump_file(DUMP);
    let mut db = RecordingDatabase::new();

    load_dump(&mut db, &path, "shop_").await.unwrap();

    let statements = db.statements();
    assert_eq!(statements.len(), 3);
    assert!(statements[0].starts_with("INSERT INTO `shop_country`"));
    assert!(statements[1].starts_with("INSERT INTO `shop_currency`"));
    assert!(statements[2].starts_with("INSERT INTO `shop_setting`"));
    // Only the table after `INSERT INTO` is renamed; values keep their text.
    assert!(statements[2].contains("'config_name'"));
}

#[tokio::test]
async fn unterminated_final_block_is_not_executed() {
    let (_dir, path) = dump_file(
        "INSERT INTO `oc_a` VALUES (1);\nINSERT INTO `oc_b` VALUES\n(2, 'no terminator')\n",
    );
    let mut db = RecordingDatabase::new();

    let summary = load_dump(&mut db, &path, "oc_").await.unwrap();

    assert_eq!(summary.statements, 1);
    assert!(summary.unterminated);
    assert_eq!(db.statements(), ["INSERT INTO `oc_a` VALUES (1);\n"]);
}

#[tokio::test]
async fn only_unterminated_block_executes_nothing() {
    let (_dir, path) = dump_file("INSERT INTO `oc_a` VALUES\n(1, 'open'),\n");
    let mut db = RecordingDatabase::new();

    let summary = load_dump(&mut db, &path, "oc_").await.unwrap();

    assert_eq!(summary.statements, 0);
    assert!(db.statements().is_empty());
}

#[tokio::test]
async fn second_start_discards_the_first() {
    let (_dir, path) = dump_file(
        "INSERT INTO `oc_a` VALUES\n(1, 'lost'),\nINSERT INTO `oc_b` VALUES\n(2, 'kept');\n",
    );
    let mut db = RecordingDatabase::new();

    let summary = load_dump(&mut db, &path, "oc_").await.unwrap();

    assert_eq!(summary.statements, 1);
    assert_eq!(summary.abandoned, 1);
    assert_eq!(
        db.statements(),
        ["INSERT INTO `oc_b` VALUES\n(2, 'kept');\n"]
    );
}

#[tokio::test]
async fn missing_dump_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("opencart.sql");
    let mut db = RecordingDatabase::new();

    let err = load_dump(&mut db, &path, "oc_").await.unwrap_err();

    assert!(matches!(err, InstallError::SqlDumpNotFound(ref missing) if *missing == path));
    assert!(db.statements().is_empty());
}

#[tokio::test]
async fn fixups_run_in_order() {
    let options = sample_options(&["--db_prefix", "shop_"]);
    let mut db = RecordingDatabase::new().with_insert_id(7);

    let api_id = apply_fixups(&mut db, &options, 2026).await.unwrap();

    assert_eq!(api_id, 7);
    let statements = db.statements();
    assert_eq!(statements.len(), 13);
    assert_eq!(statements[0], SET_CHARSET);
    assert_eq!(statements[1], RELAX_SQL_MODE);
    assert_eq!(statements[2], "DELETE FROM `shop_user` WHERE user_id = '1'");
    assert!(statements[3].starts_with("INSERT INTO `shop_user` SET user_id = '1'"));
    assert!(statements[3].contains("username = 'admin'"));
    assert!(statements[3].contains("password = '$argon2id$"));
    assert!(statements[3].contains("email = 'youremail@example.com'"));
    assert_eq!(
        statements[4],
        "DELETE FROM `shop_setting` WHERE `key` = 'config_email'"
    );
    assert!(statements[5].ends_with("`key` = 'config_email', value = 'youremail@example.com'"));
    assert_eq!(
        statements[6],
        "DELETE FROM `shop_setting` WHERE `key` = 'config_encryption'"
    );
    assert!(statements[7].contains("`key` = 'config_encryption'"));
    assert_eq!(statements[8], "UPDATE `shop_product` SET `viewed` = '0'");
    assert!(statements[9].starts_with("INSERT INTO `shop_api` SET username = 'Default'"));
    assert_eq!(
        statements[10],
        "DELETE FROM `shop_setting` WHERE `key` = 'config_api_id'"
    );
    assert!(statements[11].ends_with("`key` = 'config_api_id', value = '7'"));
    assert_eq!(
        statements[12],
        "UPDATE `shop_setting` SET `value` = 'INV-2026-00' WHERE `key` = 'config_invoice_prefix'"
    );
}

#[tokio::test]
async fn generated_secrets_have_expected_length() {
    let options = sample_options(&[]);
    let mut db = RecordingDatabase::new();

    apply_fixups(&mut db, &options, 2026).await.unwrap();

    let statements = db.statements();
    let encryption = statements[7]
        .rsplit_once("value = '")
        .map(|(_, rest)| rest.trim_end_matches('\''))
        .unwrap();
    assert_eq!(encryption.len(), 256);
    assert!(encryption.chars().all(|c| c.is_ascii_hexdigit()));

    let api_key = statements[9]
        .split_once("`key` = '")
        .and_then(|(_, rest)| rest.split_once('\''))
        .map(|(key, _)| key)
        .unwrap();
    assert_eq!(api_key.len(), 64);

    // The plain admin password never reaches the database.
    let password = options.admin.password.expose_secret();
    assert!(!statements[3].contains(&format!("password = '{password}'")));
}

#[tokio::test]
async fn connection_closed_after_success() {
    let (_dir, path) = dump_file(DUMP);
    let db = RecordingDatabase::new();
    let handle = db.clone();

    let summary = seed_database(db, &path, &sample_options(&[]), 2026)
        .await
        .unwrap();

    assert_eq!(summary.statements, 3);
    assert!(handle.is_closed());
    // Dump statements first, then the fixups.
    assert_eq!(handle.statements()[3], SET_CHARSET);
}

#[tokio::test]
async fn failure_aborts_and_still_closes() {
    let (_dir, path) = dump_file(DUMP);
    let db = RecordingDatabase::new().failing_on("`oc_currency`");
    let handle = db.clone();

    let err = seed_database(db, &path, &sample_options(&[]), 2026)
        .await
        .unwrap_err();

    assert!(matches!(err, InstallError::Database(_)));
    assert!(err.to_string().contains("statement rejected by test"));
    assert!(handle.is_closed());
    // The failing statement was the last one attempted.
    let statements = handle.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[1].starts_with("INSERT INTO `oc_currency`"));
}

#[tokio::test]
async fn missing_dump_still_closes() {
    let dir = tempfile::tempdir().unwrap();
    let db = RecordingDatabase::new();
    let handle = db.clone();

    let err = seed_database(db, &dir.path().join("absent.sql"), &sample_options(&[]), 2026)
        .await
        .unwrap_err();

    assert!(matches!(err, InstallError::SqlDumpNotFound(_)));
    assert!(handle.is_closed());
}
