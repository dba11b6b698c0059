fn main() -> std::process::ExitCode {
    mclauncher_lib::run()
}
