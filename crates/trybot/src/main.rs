//! Entrypoint.

use trybot::initialize_command_line;

fn main() -> anyhow::Result<()> {
    initialize_command_line()
}
