//! Unit tests for launch-command derivation from the probe command.

use plotpipe::engine::probe::{launch_command, VERSION_FLAG};

#[test]
fn strips_trailing_version_flag() {
    assert_eq!(launch_command("/usr/bin/gnuplot -V"), "/usr/bin/gnuplot");
}

#[test]
fn leaves_command_without_flag_untouched() {
    assert_eq!(launch_command("/usr/bin/gnuplot"), "/usr/bin/gnuplot");
}

#[test]
fn only_the_trailing_flag_is_removed() {
    assert_eq!(launch_command("/opt/-V/gnuplot -V"), "/opt/-V/gnuplot");
}

#[test]
fn version_flag_is_three_characters_with_separator() {
    // The wire contract strips a 3-character suffix: space plus flag.
    assert_eq!(format!(" {VERSION_FLAG}").len(), 3);
}
