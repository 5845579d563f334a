mod common;

use sve_core::schema::{self, PROPS};
use sve_core::{
    DecodeError, Error, PropValue, SchemaError, Shortcut, Shortcuts, StoreOpts, TimeFormat,
    Validation,
};

#[test]
fn schema_order_is_contiguous() {
    for (i, p) in PROPS.iter().enumerate() {
        assert_eq!(p.order, i, "{}", p.name);
    }
    assert_eq!(PROPS[0].name, "index");
    assert!(PROPS[0].wire_name.is_none());
    assert_eq!(PROPS[17].name, "tags");
}

#[test]
fn schema_type_queries() {
    assert_eq!(sve_core::prop_is_uint32("app_id"), Ok(true));
    assert_eq!(sve_core::prop_is_uint32("APP_NAME"), Ok(false));
    assert_eq!(sve_core::prop_is_string("exe"), Ok(true));
    assert_eq!(sve_core::prop_is_stringarr("tags"), Ok(true));
    assert_eq!(
        sve_core::prop_is_uint32("bogus"),
        Err(SchemaError::UnknownProperty {
            name: "bogus".into()
        })
    );
}

#[test]
fn validation_table() {
    use sve_core::is_prop_valid;
    assert_eq!(is_prop_valid("app_id", "0"), Validation::InvalidValue);
    assert_eq!(is_prop_valid("app_id", "12"), Validation::Ok);
    assert_eq!(is_prop_valid("is_hidden", "0"), Validation::Ok);
    assert_eq!(is_prop_valid("is_hidden", "-1"), Validation::InvalidValue);
    assert_eq!(is_prop_valid("is_hidden", "4294967296"), Validation::InvalidValue);
    assert_eq!(is_prop_valid("app_name", ""), Validation::InvalidValue);
    assert_eq!(is_prop_valid("icon", ""), Validation::Ok);
    assert_eq!(is_prop_valid("bogus_key", "x"), Validation::InvalidKey);
    assert_eq!(is_prop_valid("tags", "[\"a\",\"b\"]"), Validation::Ok);
    assert_eq!(is_prop_valid("tags", "not-json"), Validation::InvalidArrayValue);
    assert_eq!(is_prop_valid("tags", "[1,2]"), Validation::InvalidArrayValue);
    assert_eq!(schema::validate("App_Id", "0", true), Validation::Ok);
}

#[test]
fn text_array_normalization() {
    assert_eq!(
        schema::encode_text_array(r#"[ "x" , "say \"hi\"" ]"#).unwrap(),
        r#"["x","say \"hi\""]"#
    );
    assert_eq!(schema::encode_text_array("[]").unwrap(), "[]");
    assert!(matches!(
        schema::encode_text_array("{\"a\":1}"),
        Err(SchemaError::NotAnArray { .. })
    ));
    assert!(schema::encode_text_array("[\"a\", 3]").is_err());
}

#[test]
fn parse_sample_file() {
    let scs = Shortcuts::parse_bytes(&common::sample_file()).expect("parse");
    assert_eq!(scs.len(), 2);
    let first = scs.get(0).unwrap();
    assert_eq!(first.index(), 0);
    assert_eq!(first.prop_to_u32("app_id"), Some(3_000_000_001));
    assert_eq!(first.prop_to_string("app_name").as_deref(), Some("Game One"));
    assert_eq!(first.prop_to_string("index").as_deref(), Some("0"));
    assert_eq!(first.tags(), ["favorite", "Indie"]);
    assert_eq!(
        first.prop_to_string("tags").as_deref(),
        Some(r#"["favorite","Indie"]"#)
    );
    let second = scs.get(1).unwrap();
    assert_eq!(second.prop_to_string("APP_NAME").as_deref(), Some("Ünïcode Game"));
    assert!(second.tags().is_empty());
}

#[test]
fn missing_properties_get_defaults() {
    let mut data = Vec::new();
    common::map_start(&mut data, "shortcuts");
    common::map_start(&mut data, "4");
    common::uint(&mut data, "appid", 99);
    common::map_end(&mut data);
    common::map_end(&mut data);
    common::map_end(&mut data);

    let scs = Shortcuts::parse_bytes(&data).unwrap();
    let sc = scs.get(4).unwrap();
    assert_eq!(sc.prop_to_string("exe").as_deref(), Some("ERROR"));
    assert_eq!(sc.prop_to_string("app_name").as_deref(), Some("ERROR"));
    assert_eq!(sc.prop_to_string("start_dir").as_deref(), Some(""));
    assert_eq!(sc.prop_to_u32("is_hidden"), Some(0));
    assert_eq!(sc.get("tags"), Some(&PropValue::TextArray(vec![])));
}

#[test]
fn unedited_file_is_stored_byte_for_byte() {
    let data = common::sample_file();
    let scs = Shortcuts::parse_bytes(&data).unwrap();
    let out = scs.to_bytes().unwrap();
    assert_eq!(out, data);
    assert!(out.ends_with(&[0x08, 0x08]));
}

#[test]
fn store_and_parse_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("shortcuts.vdf");
    let mut scs = Shortcuts::parse_bytes(&common::sample_file()).unwrap();
    scs.get_or_create(1, |_, sc| sc.set_from_str("launch_options", "-novid"))
        .unwrap();
    scs.store_into(&p).unwrap();
    let back = Shortcuts::parse(&p).unwrap();
    assert_eq!(back, scs);
    assert_eq!(
        back.get(1).unwrap().prop_to_string("launch_options").as_deref(),
        Some("-novid")
    );
}

#[test]
fn empty_collection_round_trip() {
    let scs = Shortcuts::empty();
    let bytes = scs.to_bytes().unwrap();
    assert_eq!(bytes, b"\0shortcuts\0\x08\x08");
    assert!(Shortcuts::parse_bytes(&bytes).unwrap().is_empty());
}

#[test]
fn parse_structural_errors() {
    let mut data = Vec::new();
    common::uint(&mut data, "other", 1);
    assert_eq!(
        Shortcuts::parse_bytes(&data).unwrap_err(),
        DecodeError::MissingShortcuts
    );

    let mut data = Vec::new();
    common::text(&mut data, "shortcuts", "x");
    assert!(matches!(
        Shortcuts::parse_bytes(&data).unwrap_err(),
        DecodeError::NotAMap { .. }
    ));

    let mut data = Vec::new();
    common::map_start(&mut data, "shortcuts");
    common::map_start(&mut data, "first");
    common::map_end(&mut data);
    common::map_end(&mut data);
    assert_eq!(
        Shortcuts::parse_bytes(&data).unwrap_err(),
        DecodeError::InvalidIndex {
            key: "first".into()
        }
    );
}

#[test]
fn wrong_wire_type_is_a_decode_error() {
    let mut data = Vec::new();
    common::map_start(&mut data, "shortcuts");
    common::map_start(&mut data, "0");
    common::text(&mut data, "appid", "123");
    common::map_end(&mut data);
    common::map_end(&mut data);
    assert_eq!(
        Shortcuts::parse_bytes(&data).unwrap_err(),
        DecodeError::TypeMismatch {
            index: 0,
            property: "app_id",
            expected: "uint32",
            found: "string",
        }
    );
}

#[test]
fn to_tree_requires_every_property() {
    let mut sc = Shortcut::with_defaults(3);
    assert!(sc.to_tree().is_ok());
    sc.remove("exe");
    assert_eq!(
        sc.to_tree().unwrap_err(),
        SchemaError::MissingProperty {
            index: 3,
            property: "exe"
        }
    );
    assert!(Shortcut::empty(0).to_tree().is_err());
}

#[test]
fn to_tree_orders_by_schema_not_insertion() {
    let mut sc = Shortcut::empty(0);
    for p in PROPS.iter().rev().filter(|p| p.wire_name.is_some()) {
        sc.set(p.name, p.default.into()).unwrap();
    }
    let tree = sc.to_tree().unwrap();
    let keys: Vec<&str> = tree.iter().map(|(k, _)| k).collect();
    assert_eq!(keys.first(), Some(&"appid"));
    assert_eq!(keys.get(1), Some(&"AppName"));
    assert_eq!(keys.last(), Some(&"tags"));
    assert_eq!(keys.len(), PROPS.len() - 1);
}

#[test]
fn property_setters_check_types() {
    let mut sc = Shortcut::with_defaults(0);
    assert_eq!(
        sc.set("index", PropValue::UInt32(5)),
        Err(SchemaError::ReadOnly { property: "index" })
    );
    assert!(matches!(
        sc.set("app_id", PropValue::Text("x".into())),
        Err(SchemaError::TypeMismatch { .. })
    ));
    sc.set_from_str("Tags", r#"["a","b"]"#).unwrap();
    assert_eq!(sc.tags(), ["a", "b"]);
    assert!(matches!(
        sc.set_from_str("app_id", "zero"),
        Err(SchemaError::InvalidValue { .. })
    ));
    assert!(matches!(
        sc.set_from_str("tags", "nope"),
        Err(SchemaError::NotAnArray { .. })
    ));
}

#[test]
fn get_or_create_appends_after_max() {
    let mut scs = Shortcuts::empty();
    let created = scs
        .get_or_create(999, |is_new, sc| {
            assert!(is_new);
            sc.set_from_str("app_name", "New")
        })
        .unwrap();
    assert!(created);
    assert!(scs.get(999).is_none());
    assert_eq!(scs.get(1).unwrap().index(), 1);

    let created = scs
        .get_or_create(1, |is_new, sc| {
            assert!(!is_new);
            sc.set_from_str("exe", "/bin/true")
        })
        .unwrap();
    assert!(!created);
    assert_eq!(scs.len(), 1);

    scs.get_or_create(0, |_, _| Ok::<(), SchemaError>(())).unwrap();
    assert_eq!(scs.iter().map(Shortcut::index).collect::<Vec<_>>(), [1, 2]);
}

#[test]
fn get_or_create_drops_record_when_mutator_fails() {
    let mut scs = Shortcuts::empty();
    let res = scs.get_or_create(0, |_, sc| sc.set_from_str("app_id", "0"));
    assert!(res.is_err());
    assert!(scs.is_empty());
}

#[test]
fn get_or_create_refuses_when_index_space_is_used_up() {
    let mut data = Vec::new();
    common::map_start(&mut data, "shortcuts");
    common::record(&mut data, u32::MAX, 7, "Top", &[]);
    common::map_end(&mut data);
    common::map_end(&mut data);
    let mut scs = Shortcuts::parse_bytes(&data).unwrap();
    assert_eq!(scs.max_index(), Some(u32::MAX));

    let res = scs.get_or_create(0, |_, sc| sc.set_from_str("app_name", "Fresh"));
    assert_eq!(res, Err(SchemaError::CollectionFull));
    assert_eq!(scs.len(), 1);
    assert_eq!(
        scs.get(u32::MAX).unwrap().prop_to_string("app_name").as_deref(),
        Some("Top")
    );

    // existing records can still be edited
    let created = sve_core::apply_edit(&mut scs, u32::MAX, "app_name", "Still top").unwrap();
    assert!(!created);
}

#[test]
fn foreach_stops_on_false() {
    let scs = Shortcuts::parse_bytes(&common::sample_file()).unwrap();
    let mut seen = Vec::new();
    scs.foreach(|sc| {
        seen.push(sc.index());
        false
    });
    assert_eq!(seen, [0]);
    let mut all = 0;
    scs.foreach(|_| {
        all += 1;
        true
    });
    assert_eq!(all, 2);
}

#[test]
fn last_played_formats() {
    let scs = Shortcuts::parse_bytes(&common::sample_file()).unwrap();
    let sc = scs.get(0).unwrap();
    assert_eq!(sc.format_last_played(TimeFormat::Raw), "1700000000");
    assert_eq!(
        sc.format_last_played(TimeFormat::Utc),
        "2023/11/14, 22:13:20 UTC"
    );
    assert_eq!(
        sc.format_last_played(TimeFormat::Iso),
        "2023-11-14T22:13:20+00:00"
    );
    let fresh = Shortcut::with_defaults(0);
    assert!(fresh.last_played().is_none());
    assert_eq!(fresh.format_last_played(TimeFormat::Utc), "never");
}

#[test]
fn apply_edit_validates_and_appends() {
    let mut scs = Shortcuts::parse_bytes(&common::sample_file()).unwrap();
    assert!(!sve_core::apply_edit(&mut scs, 0, "is_hidden", "1").unwrap());
    assert_eq!(scs.get(0).unwrap().prop_to_u32("is_hidden"), Some(1));

    assert!(sve_core::apply_edit(&mut scs, 40, "app_name", "Appended").unwrap());
    assert_eq!(
        scs.get(2).unwrap().prop_to_string("app_name").as_deref(),
        Some("Appended")
    );

    let err = sve_core::apply_edit(&mut scs, 0, "nope", "1").unwrap_err();
    assert!(matches!(err, Error::Schema(SchemaError::UnknownProperty { .. })));
    let err = sve_core::apply_edit(&mut scs, 0, "app_name", "").unwrap_err();
    assert!(matches!(err, Error::Schema(SchemaError::InvalidValue { .. })));
    assert_eq!(scs.len(), 3);
}

#[test]
fn store_with_guards_and_backs_up() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("shortcuts.vdf");
    let scs = Shortcuts::parse_bytes(&common::sample_file()).unwrap();

    assert_eq!(
        sve_core::store_with(&scs, &p, &StoreOpts::default()).unwrap(),
        None
    );
    let err = sve_core::store_with(&scs, &p, &StoreOpts::default()).unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));

    let opts = StoreOpts {
        force: true,
        backup: true,
    };
    let backup = sve_core::store_with(&scs, &p, &opts).unwrap().expect("backup");
    assert!(backup.exists());
    assert_eq!(backup.extension().and_then(|e| e.to_str()), Some("zip"));

    let opts = StoreOpts {
        force: true,
        backup: false,
    };
    assert_eq!(sve_core::store_with(&scs, &p, &opts).unwrap(), None);
    assert_eq!(std::fs::read(&p).unwrap(), common::sample_file());
}

#[test]
fn resolve_and_find_shortcuts_files() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("userdata/123/config");
    std::fs::create_dir_all(&cfg).unwrap();
    let file = cfg.join("shortcuts.vdf");
    std::fs::write(&file, common::sample_file()).unwrap();
    std::fs::write(cfg.join("localconfig.vdf"), b"x").unwrap();

    assert_eq!(sve_core::resolve_shortcuts_path(&cfg).unwrap(), file);
    assert_eq!(sve_core::resolve_shortcuts_path(&file).unwrap(), file);
    assert!(matches!(
        sve_core::resolve_shortcuts_path(dir.path()),
        Err(Error::NotFound(_))
    ));
    assert_eq!(sve_core::find_shortcuts_files(dir.path()), vec![file]);
}
