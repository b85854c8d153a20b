fn main() -> std::process::ExitCode {
    pantry_sync_lib::run()
}
