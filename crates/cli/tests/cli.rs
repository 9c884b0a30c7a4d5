use assert_cmd::Command;

// Nothing listens here, so any command that reaches the network fails.
const DEAD_API: &str = "http://127.0.0.1:1/api/bookings";

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("clinic-cli").unwrap();
    cmd.env_remove("CLINIC_API_URL").arg("--api-url").arg(DEAD_API);
    cmd
}

fn stderr_of(cmd: &mut Command) -> String {
    let output = cmd.assert().failure().get_output().clone();
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn help_lists_commands() {
    let output = Command::cargo_bin("clinic-cli")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8_lossy(&output.stdout);

    for command in ["list", "show", "book", "edit", "delete"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn past_date_is_rejected_before_any_request() {
    let stderr = stderr_of(cli().args([
        "book", "--date", "2001-01-01", "--start", "09:00", "--end", "09:30",
    ]));
    assert!(stderr.contains("You cannot book an appointment on a date that has already passed."));
}

#[test]
fn reversed_times_are_rejected() {
    let stderr = stderr_of(cli().args([
        "book", "--date", "2999-01-01", "--start", "10:00", "--end", "09:30",
    ]));
    assert!(stderr.contains("End time must be after start time."));
}

#[test]
fn unknown_service_is_a_usage_error() {
    let stderr = stderr_of(cli().args([
        "book", "--date", "2999-01-01", "--start", "09:00", "--end", "09:30", "--service",
        "Massage",
    ]));
    assert!(stderr.contains("unknown service 'Massage'"));
}

#[test]
fn valid_booking_against_dead_server_reports_save_failure() {
    let stderr = stderr_of(cli().args([
        "book", "--date", "2999-01-01", "--start", "09:00", "--end", "09:30",
    ]));
    assert!(stderr.contains("Failed to save appointment. Please try again."));
}

#[test]
fn declined_delete_is_cancelled() {
    let output = cli()
        .args(["delete", "3"])
        .write_stdin("n\n")
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Are you sure you want to delete this booking?"));
    assert!(stdout.contains("Delete cancelled"));
}

#[test]
fn confirmed_delete_against_dead_server_fails() {
    let stderr = stderr_of(cli().args(["delete", "3", "--yes"]));
    assert!(stderr.contains("Failed to delete booking."));
}
