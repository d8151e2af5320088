use clap::CommandFactory;

use super::*;

#[test]
fn cli_definition_is_valid() {
    Cli::command().debug_assert();
}

fn is_builtin(id: &str) -> bool {
    matches!(id, "help" | "version")
}

#[test]
fn every_flag_and_argument_has_help_text() {
    let cli = Cli::command();
    let mut missing = Vec::new();
    for arg in cli.get_arguments().filter(|a| !is_builtin(a.get_id().as_str())) {
        if arg.get_help().is_none() {
            missing.push(format!("mapdraw {}", arg.get_id()));
        }
    }
    for sub in cli.get_subcommands().filter(|s| s.get_name() != "help") {
        for arg in sub.get_arguments().filter(|a| !is_builtin(a.get_id().as_str())) {
            if arg.get_help().is_none() {
                missing.push(format!("mapdraw {} {}", sub.get_name(), arg.get_id()));
            }
        }
    }
    assert!(missing.is_empty(), "arguments without help text:\n{}", missing.join("\n"));
}

#[test]
fn polygon_parses_lon_lat_pairs_and_view_flags() {
    let cli = Cli::try_parse_from(["mapdraw", "polygon", "2.35,48.85", "2.36,48.85", "2.36,48.86", "--width", "1024"]).unwrap();
    let Command::Polygon { vertices, view } = cli.command else {
        panic!("expected polygon command");
    };
    assert_eq!(vertices.len(), 3);
    assert_eq!(vertices[1], LonLat::new(2.36, 48.85));
    assert!((view.width - 1024.0).abs() < f64::EPSILON);
    assert!((view.height - 600.0).abs() < f64::EPSILON);
}

#[test]
fn out_of_range_latitude_is_rejected() {
    assert!(Cli::try_parse_from(["mapdraw", "point", "2.35", "89.9"]).is_err());
    assert!(parse_lon_lat("2.35").is_err());
}
