//! End-to-end CLI tests, driven through the built `shv` binary.

mod e2e {
    mod cli_basic;
    mod state_mode;
}
