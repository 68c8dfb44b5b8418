/// Configuration of node storage for a list
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct Config(Arc<ConfigInner>);

impl Config {
    pub fn new(initial_capacity: usize, max_nodes: Option<usize>) -> Self {
        let inner = ConfigInner {
            initial_capacity,
            max_nodes,
        };
        Self(Arc::new(inner))
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

impl std::ops::Deref for Config {
    type Target = ConfigInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigInner {
    /// Node slots reserved when the list is created
    pub initial_capacity: usize,
    /// Upper bound on live nodes, `None` for no bound
    pub max_nodes: Option<usize>,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_nodes: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    inner: ConfigInner,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.inner.initial_capacity = capacity;
        self
    }

    pub fn max_nodes(mut self, max: usize) -> Self {
        self.inner.max_nodes = Some(max);
        self
    }

    pub fn build(self) -> Config {
        Config(Arc::new(self.inner))
    }
}
