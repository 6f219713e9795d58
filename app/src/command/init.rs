use lingua_config::Config;

/// Strategy for initializing the configuration.
///
/// Creates the default configuration file at `~/lingua/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::create_config()?;
        println!("Config created at: {}", path.display());
        println!("Set {} in the environment or a .env file.", lingua_config::API_KEY_VAR);
        Ok(())
    }
}
