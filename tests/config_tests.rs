//! Configuration tests - JSON rule sets end to end

use blockfall::core::{ConfigError, Engine, EngineConfig, NoopSink, ShapeCatalog};
use blockfall::types::{Offset, ShapeKind};

const SMALL_BOARD: &str = r#"{
    "columns": 6,
    "rows": 8,
    "gravity_ms": 100,
    "spawn_offset": [3, -1],
    "line_scores": [10, 20, 30, 40]
}"#;

#[test]
fn test_small_board_from_json_runs() {
    let config = EngineConfig::from_json_str(SMALL_BOARD).unwrap();
    assert_eq!(config.spawn_offset(), Offset::new(3, -1));
    assert_eq!(config.shapes, ShapeCatalog::default());

    let mut e = Engine::new(config, || ShapeKind::O, NoopSink).unwrap();
    assert_eq!(e.grid().columns(), 6);
    assert_eq!(e.grid().rows(), 8);

    // Squares pile up in two columns until one locks above the field.
    for _ in 0..200 {
        e.step(&[], 100);
        if e.is_game_over() {
            break;
        }
    }
    assert!(e.is_game_over());
    assert!(e.grid().occupied_count() > 0);
}

#[test]
fn test_full_catalog_override() {
    let json = r#"{ "shapes": {
        "I": { "offsets": [[0,0],[0,-1],[0,1],[0,2]], "color": [1,1,1] },
        "O": { "offsets": [[0,0],[1,0],[0,1],[1,1]], "color": [2,2,2] },
        "T": { "offsets": [[0,0],[-1,0],[1,0],[0,1]], "color": [3,3,3] },
        "S": { "offsets": [[0,0],[1,0],[0,1],[-1,1]], "color": [4,4,4] },
        "Z": { "offsets": [[0,0],[-1,0],[0,1],[1,1]], "color": [5,5,5] },
        "J": { "offsets": [[0,0],[-1,0],[1,0],[1,1]], "color": [6,6,6] },
        "L": { "offsets": [[0,0],[-1,0],[1,0],[-1,1]], "color": [7,7,7] }
    } }"#;
    let config = EngineConfig::from_json_str(json).unwrap();
    let bar = config.shapes.get(ShapeKind::I);
    assert_eq!(bar.offsets[3], Offset::new(0, 2));
    assert_eq!(config.shapes.get(ShapeKind::L).color.r, 7);
}

#[test]
fn test_spawn_below_board_is_rejected() {
    let err = EngineConfig::from_json_str(r#"{ "rows": 4, "spawn_offset": [5, 3] }"#).unwrap_err();
    assert!(matches!(err, ConfigError::SpawnOutOfBounds { .. }));
    assert!(err.to_string().contains("outside a 10x4 board"));
}

#[test]
fn test_bad_json_is_a_config_error() {
    let err = EngineConfig::from_json_str("{ rows: 3").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_engine_rejects_invalid_config() {
    let config = EngineConfig {
        soft_drop_factor: 0.0,
        ..EngineConfig::default()
    };
    let err = Engine::new(config, || ShapeKind::T, NoopSink).err();
    assert!(matches!(
        err,
        Some(ConfigError::BadFactor { name: "soft_drop_factor", .. })
    ));
}

#[test]
fn test_extreme_spawn_rows_are_rejected() {
    for json in [
        r#"{ "spawn_offset": [5, -2147483648] }"#,
        r#"{ "spawn_offset": [5, -100000000] }"#,
        r#"{ "spawn_offset": [2147483647, 0] }"#,
    ] {
        let err = EngineConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::SpawnOffsetOutOfRange { .. }), "{json}: {err}");
    }

    // As high above the field as the field is tall is still accepted.
    let config = EngineConfig::from_json_str(r#"{ "spawn_offset": [5, -20] }"#).unwrap();
    assert_eq!(config.spawn_offset(), Offset::new(5, -20));
}

#[test]
fn test_far_catalog_offsets_are_rejected() {
    let json = r#"{ "shapes": {
        "I": { "offsets": [[0,0],[0,-1],[0,1],[0,2]], "color": [1,1,1] },
        "O": { "offsets": [[0,0],[1,0],[0,1],[1,1]], "color": [2,2,2] },
        "T": { "offsets": [[0,0],[-1,0],[1,0],[0,1]], "color": [3,3,3] },
        "S": { "offsets": [[0,0],[1,0],[0,1],[-1,1]], "color": [4,4,4] },
        "Z": { "offsets": [[0,0],[-1,0],[0,1],[1,1]], "color": [5,5,5] },
        "J": { "offsets": [[0,0],[-1,0],[1,0],[1,1]], "color": [6,6,6] },
        "L": { "offsets": [[0,0],[-1,0],[1,0],[0,-2147483648]], "color": [7,7,7] }
    } }"#;
    let err = EngineConfig::from_json_str(json).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::OffsetOutOfRange {
            kind: ShapeKind::L,
            ..
        }
    ));
}

#[test]
fn test_level_soft_drop_factor_is_validated() {
    let config = EngineConfig::from_json_str(r#"{ "level_soft_drop_factor": 0.5 }"#).unwrap();
    assert_eq!(config.level_soft_drop_factor, 0.5);

    let err = EngineConfig::from_json_str(r#"{ "level_soft_drop_factor": 2.0 }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::BadFactor { name: "level_soft_drop_factor", .. }
    ));
}
