//! Integration tests for netplay sessions
//!
//! Two sessions on loopback UDP sockets: peer discovery from a probe, packet
//! exchange through the engine, and a full save / advance / rollback cycle
//! against a real transport.

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::actor::ActorType;
    use crate::session::Session;
    use crate::test_utils::{RecordingSimulation, Scripted, ScriptedEngine, test_config};

    type TestSession = Session<ScriptedEngine, RecordingSimulation>;

    fn owned_session() -> TestSession {
        Session::init(
            test_config(),
            ScriptedEngine::factory(),
            RecordingSimulation::with_state(vec![1, 2, 3, 4]),
        )
        .unwrap()
    }

    fn loopback(session: &TestSession) -> String {
        format!("127.0.0.1:{}", session.local_port().unwrap())
    }

    /// Tick `session` until `done` holds or a second passes
    fn poll_until(session: &mut TestSession, done: impl Fn(&TestSession) -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(1) {
            session.poll_once();
            if done(session) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_probe_triggers_auto_discovery() {
        let mut host = owned_session();
        let mut guest = owned_session();
        host.add_actor(ActorType::Local, None).unwrap();

        guest.send_probe(&loopback(&host)).unwrap();

        assert!(poll_until(&mut host, |s| s.remote_actor_count() == 1));
        let guest_addr = loopback(&guest);
        assert!(host.registry().is_known(&guest_addr));

        let engine = host.engine().unwrap();
        assert_eq!(engine.actor_addrs(ActorType::Remote), vec![guest_addr.as_str()]);
        // The probe that caused the registration was also seen by the engine
        assert!(!engine.received.is_empty());
    }

    #[test]
    fn test_engines_exchange_packets() {
        let mut a = owned_session();
        let mut b = owned_session();
        let b_addr = loopback(&b);
        let a_addr = loopback(&a);

        a.add_actor(ActorType::Local, None).unwrap();
        a.add_actor(ActorType::Remote, Some(&b_addr)).unwrap();
        b.add_actor(ActorType::Local, None).unwrap();
        b.add_actor(ActorType::Remote, Some(&a_addr)).unwrap();

        a.engine_mut()
            .unwrap()
            .outgoing
            .push((b_addr, b"input:1".to_vec()));
        a.poll_once();

        assert!(poll_until(&mut b, |s| !s.engine().unwrap().received.is_empty()));
        let received = &b.engine().unwrap().received;
        assert_eq!(received[0].payload(), b"input:1");
        assert_eq!(received[0].address(), a_addr);
        // Already registered: no extra actor
        assert_eq!(b.remote_actor_count(), 1);
    }

    #[test]
    fn test_rollback_cycle_over_udp() {
        let mut session = owned_session();
        let me = session.add_actor(ActorType::Local, None).unwrap();
        session
            .add_actor(ActorType::Remote, Some("127.0.0.1:9"))
            .unwrap();

        session.push_local_input(me, &[1; 16]).unwrap();
        session.engine_mut().unwrap().queue_tick(vec![
            Scripted::save(0, 1024),
            Scripted::advance(0, &[1; 16]),
        ]);
        session.poll_once();

        session.engine_mut().unwrap().queue_tick(vec![
            Scripted::load(0, &[1, 2, 3, 4]),
            Scripted::resimulate(0, &[2; 16]),
            Scripted::advance(1, &[3; 16]),
        ]);
        session.poll_once();

        let sim = session.simulation();
        assert_eq!(sim.save_capacities, vec![256]);
        assert_eq!(sim.loads, vec![vec![1, 2, 3, 4]]);
        assert_eq!(sim.frames, vec![vec![1; 16], vec![2; 16], vec![3; 16]]);
        assert_eq!(session.current_input(), Some(&[3u8; 16][..]));
        assert_eq!(session.stats().rollback_frames, 1);

        assert!(session.deinit().is_none());
    }
}
