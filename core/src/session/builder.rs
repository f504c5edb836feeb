//! Session construction

use crate::config::SessionConfig;
use crate::engine::{EngineError, RollbackEngine};
use crate::registry::ActorRegistry;
use crate::simulation::Simulation;
use crate::transport::{NetAdapter, UdpTransport};

use super::dispatch::EventDispatcher;
use super::session::Session;
use super::types::{ActiveParts, InitError, TransportSlot};

impl<E: RollbackEngine, S: Simulation> Session<E, S> {
    /// Create an active session bound to `config.port`.
    ///
    /// Steps run in order: validate config, allocate the input buffer, create
    /// the engine, bind the UDP transport, start the engine. A failure at any
    /// step releases everything acquired before it.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = SessionConfig::new(2, 16, 4 * 1024 * 1024);
    /// let mut session = Session::init(config, || MyEngine::new(), core)?;
    /// let me = session.add_actor(ActorType::Local, None)?;
    /// session.add_actor(ActorType::Remote, Some("10.0.0.2:7000"))?;
    /// loop {
    ///     session.push_local_input(me, &read_pad())?;
    ///     session.poll_once();
    /// }
    /// ```
    pub fn init<F>(
        config: SessionConfig,
        create_engine: F,
        simulation: S,
    ) -> Result<Self, InitError>
    where
        F: FnOnce() -> Result<E, EngineError>,
    {
        Self::build(config, None, create_engine, simulation)
    }

    /// Create an active session on a caller-supplied packet channel.
    ///
    /// No socket is bound; `config.port` is ignored. The adapter is handed back
    /// by [`Session::deinit`].
    pub fn init_with_adapter<F>(
        config: SessionConfig,
        adapter: Box<dyn NetAdapter>,
        create_engine: F,
        simulation: S,
    ) -> Result<Self, InitError>
    where
        F: FnOnce() -> Result<E, EngineError>,
    {
        Self::build(config, Some(adapter), create_engine, simulation)
    }

    fn build<F>(
        config: SessionConfig,
        adapter: Option<Box<dyn NetAdapter>>,
        create_engine: F,
        simulation: S,
    ) -> Result<Self, InitError>
    where
        F: FnOnce() -> Result<E, EngineError>,
    {
        config.validate().inspect_err(|e| {
            tracing::error!(error = %e, "Invalid session config");
        })?;

        let dispatcher = EventDispatcher::new(config.input_size, config.state_size).map_err(
            |source| {
                tracing::error!(size = config.input_size, "Input buffer allocation failed");
                InitError::InputBuffer {
                    size: config.input_size,
                    source,
                }
            },
        )?;

        let mut engine = create_engine().map_err(|e| {
            tracing::error!(error = %e, "Engine creation failed");
            InitError::Engine(e)
        })?;

        let transport = match adapter {
            Some(adapter) => TransportSlot::External(adapter),
            None => TransportSlot::Owned(UdpTransport::bind(config.port).inspect_err(|e| {
                tracing::error!(port = config.port, error = %e, "Transport bind failed");
            })?),
        };

        engine.start(&config).map_err(|e| {
            tracing::error!(error = %e, "Engine start failed");
            InitError::Engine(e)
        })?;

        tracing::info!(
            players = config.num_players,
            spectators = config.max_spectators,
            input_size = config.input_size,
            state_size = config.state_size,
            port = transport.local_port(),
            "Netplay session started"
        );

        Ok(Self {
            config,
            active: Some(ActiveParts { engine, transport }),
            simulation,
            dispatcher,
            registry: ActorRegistry::new(),
            observer: None,
            local_actors: 0,
            remote_actors: 0,
            spectators: 0,
        })
    }
}
