use serde_json::json;
use tracing_subscriber::EnvFilter;
use ws_design::{DesignKind, InitialDesign, InitialDesignConfig};
use ws_types::{ConfigurationSpace, Hyperparameter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // SGD classifier search space
    let space = ConfigurationSpace::new()
        .add(Hyperparameter::float("alpha", 0.0, 1.0).with_default(1.0))
        .add(Hyperparameter::float("l1_ratio", 0.0, 1.0).with_default(0.5))
        .add(
            Hyperparameter::categorical(
                "learning_rate",
                vec![json!("constant"), json!("invscaling"), json!("adaptive")],
            )
            .with_default("constant"),
        )
        .add(Hyperparameter::log_float("eta0", 1e-5, 1.0).with_default(0.1));

    for kind in [
        DesignKind::Default,
        DesignKind::Random,
        DesignKind::Sobol,
        DesignKind::LatinHypercube,
        DesignKind::Factorial,
    ] {
        let config = InitialDesignConfig::new(200)
            .with_seed(12345)
            .with_max_config_ratio(0.25)
            .with_design(kind);
        let mut design = InitialDesign::new(space.clone(), config)?;
        let configs = design.select_configurations()?;

        println!("{kind:?}: init_budget={} selected={}", design.init_budget(), configs.len());
        for config in configs.iter().take(3) {
            println!("  {config}");
        }
    }

    Ok(())
}
