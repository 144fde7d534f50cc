pub mod settings;

pub use settings::{
    generate_default_config, AutomationSettings, ClusterSettings, Credentials, ServerSettings,
    Settings,
};
