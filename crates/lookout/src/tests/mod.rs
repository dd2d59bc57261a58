//! Unit tests for the lookout crate.

mod support;

mod sync_tests {
    use std::cell::Cell;
    use std::pin::Pin;
    use std::rc::Rc;
    use std::task::Context;
    use std::time::Duration;

    use futures::FutureExt;
    use futures::executor::LocalPool;
    use futures::task::{LocalSpawnExt, noop_waker_ref};
    use rstest::{fixture, rstest};

    use crate::sync::{FrameSignals, Quiescence, SyncStatus, Synchronizer, WaitTimedOut};

    struct Scheduler {
        signals: Rc<Cell<FrameSignals>>,
        sync: Synchronizer,
    }

    impl Scheduler {
        fn set(&self, transient_callbacks: bool, frame_scheduled: bool) {
            self.signals.set(FrameSignals {
                transient_callbacks,
                frame_scheduled,
            });
        }
    }

    #[fixture]
    fn scheduler() -> Scheduler {
        let signals = Rc::new(Cell::new(FrameSignals::IDLE));
        let observed = Rc::clone(&signals);
        let sync = Synchronizer::new(Rc::new(move || observed.get()));
        Scheduler { signals, sync }
    }

    fn spawn_wait(
        pool: &LocalPool,
        wait: impl Future<Output = Result<(), WaitTimedOut>> + 'static,
    ) -> Rc<Cell<Option<Result<(), WaitTimedOut>>>> {
        let slot = Rc::new(Cell::new(None));
        let output = Rc::clone(&slot);
        pool.spawner()
            .spawn_local(async move { output.set(Some(wait.await)) })
            .expect("spawn wait");
        slot
    }

    #[rstest]
    fn idle_wait_completes_without_a_tick(scheduler: Scheduler) {
        assert_eq!(scheduler.sync.wait_until_idle(None).now_or_never(), Some(Ok(())));
        assert_eq!(scheduler.sync.ticks(), 0);
    }

    #[rstest]
    fn busy_wait_resumes_on_first_fully_clear_tick(scheduler: Scheduler) {
        let mut pool = LocalPool::new();
        scheduler.set(true, true);
        let outcome = spawn_wait(&pool, scheduler.sync.wait_until_idle(None));
        pool.run_until_stalled();
        assert_eq!(outcome.get(), None);
        assert_eq!(scheduler.sync.status(), SyncStatus::Busy);

        scheduler.set(false, true);
        scheduler.sync.on_tick(Duration::from_millis(16));
        pool.run_until_stalled();
        assert_eq!(outcome.get(), None);

        scheduler.set(false, false);
        scheduler.sync.on_tick(Duration::from_millis(32));
        pool.run_until_stalled();
        assert_eq!(outcome.get(), Some(Ok(())));
        assert_eq!(scheduler.sync.status(), SyncStatus::Idle);
        assert_eq!(scheduler.sync.pending_waiters(), 0);
    }

    #[rstest]
    fn transient_wait_tolerates_a_scheduled_frame(scheduler: Scheduler) {
        let mut pool = LocalPool::new();
        scheduler.set(true, true);
        let transient = spawn_wait(&pool, scheduler.sync.wait_until_no_transient_callbacks(None));
        let idle = spawn_wait(&pool, scheduler.sync.wait_until_idle(None));
        pool.run_until_stalled();

        scheduler.set(false, true);
        scheduler.sync.on_tick(Duration::from_millis(16));
        pool.run_until_stalled();
        assert_eq!(transient.get(), Some(Ok(())));
        assert_eq!(idle.get(), None);
    }

    #[rstest]
    fn waiters_time_out_at_their_deadline(scheduler: Scheduler) {
        let mut pool = LocalPool::new();
        scheduler.set(true, false);
        let outcome = spawn_wait(
            &pool,
            scheduler.sync.wait_until_idle(Some(Duration::from_millis(100))),
        );
        pool.run_until_stalled();

        scheduler.sync.on_tick(Duration::from_millis(50));
        pool.run_until_stalled();
        assert_eq!(outcome.get(), None);

        scheduler.sync.on_tick(Duration::from_millis(100));
        pool.run_until_stalled();
        assert_eq!(
            outcome.get(),
            Some(Err(WaitTimedOut {
                condition: Quiescence::Idle
            }))
        );
    }

    #[rstest]
    fn satisfied_condition_wins_over_an_expiring_deadline(scheduler: Scheduler) {
        let mut pool = LocalPool::new();
        scheduler.set(true, false);
        let outcome = spawn_wait(
            &pool,
            scheduler.sync.wait_until_idle(Some(Duration::from_millis(10))),
        );
        pool.run_until_stalled();

        scheduler.set(false, false);
        scheduler.sync.on_tick(Duration::from_millis(10));
        pool.run_until_stalled();
        assert_eq!(outcome.get(), Some(Ok(())));
    }

    #[rstest]
    fn expired_deadline_fails_on_first_poll(scheduler: Scheduler) {
        scheduler.set(true, false);
        let outcome = scheduler
            .sync
            .wait_until_no_transient_callbacks(Some(Duration::ZERO))
            .now_or_never();
        assert_eq!(
            outcome,
            Some(Err(WaitTimedOut {
                condition: Quiescence::NoTransientCallbacks
            }))
        );
    }

    #[rstest]
    fn dropping_a_wait_withdraws_it(scheduler: Scheduler) {
        scheduler.set(true, false);
        let mut wait = scheduler.sync.wait_until_idle(None);
        let mut cx = Context::from_waker(noop_waker_ref());
        assert!(Pin::new(&mut wait).poll(&mut cx).is_pending());
        assert_eq!(scheduler.sync.pending_waiters(), 1);

        drop(wait);
        assert_eq!(scheduler.sync.pending_waiters(), 0);
    }

    #[rstest]
    fn next_tick_waits_for_a_new_tick(scheduler: Scheduler) {
        scheduler.sync.on_tick(Duration::from_millis(5));
        let mut tick = scheduler.sync.next_tick();
        let mut cx = Context::from_waker(noop_waker_ref());
        assert!(Pin::new(&mut tick).poll(&mut cx).is_pending());

        scheduler.sync.on_tick(Duration::from_millis(10));
        assert!(Pin::new(&mut tick).poll(&mut cx).is_ready());
    }

    #[rstest]
    fn clock_never_moves_backwards(scheduler: Scheduler) {
        scheduler.sync.on_tick(Duration::from_millis(40));
        scheduler.sync.on_tick(Duration::from_millis(20));
        assert_eq!(scheduler.sync.now(), Duration::from_millis(40));
        assert_eq!(scheduler.sync.ticks(), 2);
    }
}

mod dispatch_tests {
    use std::rc::Rc;
    use std::time::Duration;

    use async_trait::async_trait;
    use lookout_protocol::{
        Command, ExtensionCommand, Finder, FinderRequest, GetDiagnosticsTree, GetOffset,
        OffsetType, RequestData, ResponsePayload, SetFrameSync, TreeType, ValueKey, WaitRequest,
    };
    use lookout_tree::{Element, ElementTree, MemoryTree};
    use mockall::mock;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::support::{Harness, centred_parent, duplicate_hello, hello_column, request};
    use crate::data::{DataHandler, DataHandlerError};
    use crate::dispatch::{CommandHandler, DispatchError, DriverContext};

    mock! {
        Data {}
        #[async_trait(?Send)]
        impl DataHandler for Data {
            async fn request_data(&self, message: String) -> Result<String, DataHandlerError>;
        }
    }

    struct SilentData;

    #[async_trait(?Send)]
    impl DataHandler for SilentData {
        async fn request_data(&self, _message: String) -> Result<String, DataHandlerError> {
            futures::future::pending().await
        }
    }

    struct EchoHandler;

    #[async_trait(?Send)]
    impl CommandHandler for EchoHandler {
        async fn handle(
            &self,
            command: Command,
            _context: &DriverContext,
        ) -> Result<ResponsePayload, DispatchError> {
            let Command::Extension(ExtensionCommand { kind, fields }) = command else {
                return Err(DispatchError::internal("expected an extension command"));
            };
            Ok(ResponsePayload::Extension(json!({ "kind": kind, "fields": fields })))
        }
    }

    struct PanickingHandler;

    #[async_trait(?Send)]
    impl CommandHandler for PanickingHandler {
        async fn handle(
            &self,
            _command: Command,
            _context: &DriverContext,
        ) -> Result<ResponsePayload, DispatchError> {
            panic!("tap target vanished");
        }
    }

    fn get_text(finder: Finder, timeout: Option<Duration>) -> Value {
        request(&Command::GetText(FinderRequest { finder, timeout }))
    }

    fn get_semantics_id(finder: Finder) -> Value {
        request(&Command::GetSemanticsId(FinderRequest::new(finder)))
    }

    #[rstest]
    #[case::top_left(OffsetType::TopLeft, 350.0, 250.0)]
    #[case::bottom_right(OffsetType::BottomRight, 375.0, 275.0)]
    #[case::center(OffsetType::Center, 362.5, 262.5)]
    fn offsets_of_the_left_child(
        centred_parent: MemoryTree,
        #[case] offset_type: OffsetType,
        #[case] dx: f64,
        #[case] dy: f64,
    ) {
        let mut harness = Harness::new(centred_parent);
        let envelope = harness.call(&request(&Command::GetOffset(GetOffset {
            finder: Finder::by_key("leftchild"),
            offset_type,
            timeout: None,
        })));
        assert_eq!(envelope.response, json!({ "dx": dx, "dy": dy }));
    }

    #[rstest]
    fn ancestor_offset_reports_the_parent_corner(centred_parent: MemoryTree) {
        let mut harness = Harness::new(centred_parent);
        let envelope = harness.call(&request(&Command::GetOffset(GetOffset {
            finder: Finder::ancestor(Finder::by_key("leftchild"), Finder::by_key("parent"), false),
            offset_type: OffsetType::TopLeft,
            timeout: None,
        })));
        assert!(!envelope.is_error);
        assert_eq!(envelope.response, json!({ "dx": 350.0, "dy": 250.0 }));
    }

    #[rstest]
    fn unmatched_ancestor_offset_is_no_match(centred_parent: MemoryTree) {
        let mut harness = Harness::new(centred_parent);
        let envelope = harness.call(&request(&Command::GetOffset(GetOffset {
            finder: Finder::ancestor(
                Finder::by_key("leftchild"),
                Finder::by_key("rightchild"),
                false,
            ),
            offset_type: OffsetType::TopLeft,
            timeout: None,
        })));
        assert!(
            envelope
                .error_message()
                .is_some_and(|message| message.starts_with("no matching element for ancestor of"))
        );
    }

    #[rstest]
    fn missing_bounds_are_reported(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let envelope = harness.call(&request(&Command::GetOffset(GetOffset {
            finder: Finder::by_key("text1"),
            offset_type: OffsetType::Center,
            timeout: None,
        })));
        assert_eq!(
            envelope.error_message(),
            Some("no paint bounds for key [<'text1'>]")
        );
    }

    #[rstest]
    fn descendant_text_is_returned(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let envelope = harness.call(&get_text(
            Finder::descendant(Finder::by_key("column"), Finder::by_text("Hello2"), false),
            None,
        ));
        assert_eq!(envelope.response, json!({ "text": "Hello2" }));
    }

    #[rstest]
    fn text_of_a_non_text_element_is_unsupported(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let envelope = harness.call(&get_text(Finder::by_key("column"), None));
        assert!(envelope.is_error);
        assert!(
            envelope
                .error_message()
                .is_some_and(|message| message.starts_with("unsupported element"))
        );
    }

    #[rstest]
    fn descendant_of_a_leaf_times_out_as_no_match(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let pending = harness.send(&get_text(
            Finder::descendant(Finder::by_key("text1"), Finder::by_key("text2"), false),
            Some(Duration::from_millis(100)),
        ));
        assert!(pending.borrow().is_none());

        harness.tick_until_done(&pending, Duration::from_millis(16), 20);
        let envelope = pending.borrow_mut().take().expect("command should time out");
        assert!(envelope.is_error);
        let message = envelope.error_message().expect("message");
        assert!(message.starts_with("no matching element for descendant of"));
    }

    #[rstest]
    fn zero_timeout_makes_a_single_attempt(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let envelope = harness.call(&get_text(Finder::by_text("Hello9"), Some(Duration::ZERO)));
        assert_eq!(
            envelope.error_message(),
            Some("no matching element for text \"Hello9\"")
        );
    }

    #[rstest]
    fn zero_timeout_fails_at_once_while_animating(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        harness.set_signals(true, false);
        let envelope = harness.call(&get_text(Finder::by_key("text3"), Some(Duration::ZERO)));
        assert_eq!(
            envelope.error_message(),
            Some("timed out waiting for the application to become idle")
        );
        assert_eq!(harness.extension().synchronizer().pending_waiters(), 0);
    }

    #[rstest]
    fn finder_timeout_bounds_the_idle_wait(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        harness.set_signals(true, true);
        let pending = harness.send(&get_text(
            Finder::by_key("text3"),
            Some(Duration::from_millis(50)),
        ));
        harness.tick_until_done(&pending, Duration::from_millis(16), 10);
        let envelope = pending
            .borrow_mut()
            .take()
            .expect("finder should stop waiting at its deadline");
        assert_eq!(
            envelope.error_message(),
            Some("timed out waiting for the application to become idle")
        );
    }

    #[rstest]
    fn polling_finds_elements_added_between_ticks(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let pending = harness.send(&get_text(
            Finder::by_key("late"),
            Some(Duration::from_secs(1)),
        ));
        harness.tick(Duration::from_millis(16));
        assert!(pending.borrow().is_none());

        let root = harness.tree().current().root().expect("root");
        harness
            .tree()
            .update(|tree| {
                tree.insert_child(
                    root,
                    Element::new("Text")
                        .with_key(ValueKey::string("late"))
                        .with_text("arrived"),
                )
            })
            .expect("insert");
        harness.tick(Duration::from_millis(16));

        let envelope = pending.borrow_mut().take().expect("command should complete");
        assert_eq!(envelope.response, json!({ "text": "arrived" }));
    }

    #[rstest]
    fn duplicate_texts_are_ambiguous(duplicate_hello: MemoryTree) {
        let mut harness = Harness::new(duplicate_hello);
        let envelope = harness.call(&get_semantics_id(Finder::by_text("hello")));
        assert_eq!(
            envelope.error_message(),
            Some("too many matching elements (2) for text \"hello\"")
        );
    }

    #[rstest]
    fn ambiguity_is_not_retried(duplicate_hello: MemoryTree) {
        let mut harness = Harness::new(duplicate_hello);
        let envelope = harness.call(&request(&Command::GetSemanticsId(
            FinderRequest::new(Finder::by_text("hello")).with_timeout(Duration::from_secs(5)),
        )));
        assert!(envelope.is_error);
    }

    #[rstest]
    fn semantics_id_is_inherited_from_the_parent(centred_parent: MemoryTree) {
        let mut harness = Harness::new(centred_parent);
        let envelope = harness.call(&get_semantics_id(Finder::by_key("rightchild")));
        assert_eq!(envelope.response, json!({ "id": 7 }));
    }

    #[rstest]
    fn frame_sync_holds_finders_until_idle(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        harness.set_signals(true, false);
        let pending = harness.send(&get_text(Finder::by_key("text3"), None));
        assert!(pending.borrow().is_none());

        harness.set_signals(false, false);
        harness.tick(Duration::from_millis(16));
        let envelope = pending.borrow_mut().take().expect("command should complete");
        assert_eq!(envelope.response, json!({ "text": "Hello3" }));
    }

    #[rstest]
    fn disabling_frame_sync_skips_the_idle_wait(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        harness.set_signals(true, true);
        let toggled = harness.call(&request(&Command::SetFrameSync(SetFrameSync {
            enabled: false,
        })));
        assert_eq!(toggled.response, Value::Null);
        assert!(!harness.extension().context().frame_sync());

        let envelope = harness.call(&get_text(Finder::by_key("text3"), None));
        assert_eq!(envelope.response, json!({ "text": "Hello3" }));
    }

    #[rstest]
    fn quiescence_commands_report_timeouts(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        harness.set_signals(true, false);
        let pending = harness.send(&request(&Command::WaitUntilFrameSync(WaitRequest {
            timeout: Some(Duration::from_millis(50)),
        })));
        harness.tick_until_done(&pending, Duration::from_millis(16), 10);
        let envelope = pending.borrow_mut().take().expect("wait should time out");
        assert_eq!(
            envelope.error_message(),
            Some("timed out waiting for the application to become idle")
        );
    }

    #[rstest]
    fn no_transient_callbacks_completes_with_a_frame_pending(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        harness.set_signals(false, true);
        let envelope = harness.call(&request(&Command::WaitUntilNoTransientCallbacks(
            WaitRequest::default(),
        )));
        assert!(!envelope.is_error);
        assert_eq!(envelope.response, Value::Null);
    }

    #[rstest]
    fn wait_for_absent_completes_once_the_element_leaves(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let pending = harness.send(&request(&Command::WaitForAbsent(
            FinderRequest::new(Finder::by_key("text2")).with_timeout(Duration::from_secs(1)),
        )));
        assert!(pending.borrow().is_none());

        harness.tree().replace(MemoryTree::new());
        harness.tick(Duration::from_millis(16));
        let envelope = pending.borrow_mut().take().expect("command should complete");
        assert!(!envelope.is_error);
    }

    #[rstest]
    fn wait_for_reports_still_missing_elements(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let present = harness.call(&request(&Command::WaitFor(FinderRequest::new(
            Finder::by_type("Text"),
        ))));
        let absent = harness.call(&request(&Command::WaitFor(FinderRequest::new(
            Finder::by_type("Image"),
        ))));
        assert!(!present.is_error);
        assert_eq!(
            absent.error_message(),
            Some("no matching element for type \"Image\"")
        );
    }

    #[rstest]
    #[case::shallow(0, false)]
    #[case::deep(1, true)]
    fn diagnostics_dump_honours_depth(
        hello_column: MemoryTree,
        #[case] subtree_depth: u32,
        #[case] has_children: bool,
    ) {
        let mut harness = Harness::new(hello_column);
        harness.set_signals(true, true);
        let envelope = harness.call(&request(&Command::GetDiagnosticsTree(GetDiagnosticsTree {
            finder: Finder::by_key("column"),
            tree_type: TreeType::Widget,
            subtree_depth,
            include_properties: false,
        })));
        let node = envelope.response.as_object().expect("diagnostics object");
        assert_eq!(node.get("description"), Some(&json!("Column-[<'column'>]")));
        assert_eq!(node.contains_key("children"), has_children);
        assert!(!node.contains_key("properties"));
    }

    #[rstest]
    fn render_dump_requires_a_render_object(centred_parent: MemoryTree) {
        let mut harness = Harness::new(centred_parent);
        let envelope = harness.call(&request(&Command::GetDiagnosticsTree(GetDiagnosticsTree {
            finder: Finder::by_key("leftchild"),
            tree_type: TreeType::RenderObject,
            subtree_depth: 0,
            include_properties: true,
        })));
        assert_eq!(
            envelope.error_message(),
            Some("no render object for key [<'leftchild'>]")
        );
    }

    #[rstest]
    fn health_is_ok(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let envelope = harness.call(&request(&Command::GetHealth));
        assert_eq!(envelope.response, json!({ "status": "ok" }));
    }

    #[rstest]
    fn request_data_without_a_handler_is_unknown(hello_column: MemoryTree) {
        let mut harness = Harness::new(hello_column);
        let envelope = harness.call(&request(&Command::RequestData(RequestData {
            message: "ping".into(),
            timeout: None,
        })));
        assert_eq!(envelope.error_message(), Some("unknown command: RequestData"));
    }

    #[rstest]
    #[case::reply(Ok("pong".to_owned()), json!({ "message": "pong" }))]
    #[case::failure(
        Err(DataHandlerError::failed("not ready")),
        json!("request data failed: not ready")
    )]
    fn request_data_forwards_to_the_application(
        hello_column: MemoryTree,
        #[case] reply: Result<String, DataHandlerError>,
        #[case] expected: Value,
    ) {
        let mut data = MockData::new();
        data.expect_request_data()
            .with(eq("ping".to_owned()))
            .once()
            .returning(move |_| reply.clone());
        let mut harness =
            Harness::with_builder(hello_column, |builder| builder.data_handler(Rc::new(data)));
        let envelope = harness.call(&request(&Command::RequestData(RequestData {
            message: "ping".into(),
            timeout: None,
        })));
        assert_eq!(envelope.response, expected);
    }

    #[rstest]
    fn request_data_times_out(hello_column: MemoryTree) {
        let mut harness = Harness::with_builder(hello_column, |builder| {
            builder.data_handler(Rc::new(SilentData))
        });
        let pending = harness.send(&request(&Command::RequestData(RequestData {
            message: "ping".into(),
            timeout: Some(Duration::from_millis(30)),
        })));
        harness.tick_until_done(&pending, Duration::from_millis(16), 5);
        let envelope = pending.borrow_mut().take().expect("command should time out");
        assert_eq!(
            envelope.error_message(),
            Some("request data failed: data handler did not reply within 30ms")
        );
    }

    #[rstest]
    fn extension_commands_receive_raw_fields(hello_column: MemoryTree) {
        let mut harness = Harness::with_builder(hello_column, |builder| {
            builder.extension("Echo", Rc::new(EchoHandler))
        });
        let envelope = harness.call(&json!({ "command": "Echo", "say": "hi" }));
        assert_eq!(
            envelope.response,
            json!({ "kind": "Echo", "fields": { "say": "hi" } })
        );
    }

    #[rstest]
    fn handler_panics_become_errors(hello_column: MemoryTree) {
        let mut harness = Harness::with_builder(hello_column, |builder| {
            builder.extension("Tap", Rc::new(PanickingHandler))
        });
        let envelope = harness.call(&json!({ "command": "Tap" }));
        assert_eq!(
            envelope.error_message(),
            Some("handler for Tap failed: tap target vanished")
        );

        let health = harness.call(&request(&Command::GetHealth));
        assert!(!health.is_error);
    }

    #[rstest]
    #[case::not_json(b"not json".to_vec(), "malformed command: malformed request")]
    #[case::missing_kind(b"{}".to_vec(), "malformed command: missing 'command' discriminator")]
    #[case::unknown_kind(
        br#"{"command":"Fly"}"#.to_vec(),
        "malformed command: unknown command kind 'Fly'"
    )]
    #[case::bad_finder(
        br#"{"command":"GetText","finderType":"ByColour"}"#.to_vec(),
        "malformed command: unknown finder type 'ByColour'"
    )]
    fn malformed_requests_are_rejected(
        hello_column: MemoryTree,
        #[case] bytes: Vec<u8>,
        #[case] prefix: &str,
    ) {
        let mut harness = Harness::new(hello_column);
        let envelope = harness
            .send_bytes(bytes)
            .borrow_mut()
            .take()
            .expect("rejection is immediate");
        assert!(envelope.is_error);
        let message = envelope.error_message().expect("message");
        assert!(message.starts_with(prefix), "unexpected message: {message}");
    }
}

mod bootstrap_tests {
    use std::rc::Rc;
    use std::time::Duration;

    use lookout_config::Config;
    use lookout_tree::{LiveTree, TreeSource};

    use super::support::{ArgsConfigLoader, FailingConfigLoader};
    use crate::bootstrap::{BootstrapError, DriverParts, StaticConfigLoader, bootstrap_with};
    use crate::sync::{FrameSignals, SchedulerSignals};

    fn parts() -> DriverParts {
        let tree: Rc<dyn TreeSource> = Rc::new(LiveTree::default());
        let signals: Rc<dyn SchedulerSignals> = Rc::new(|| FrameSignals::IDLE);
        DriverParts {
            tree,
            signals,
            data_handler: None,
        }
    }

    #[test]
    fn applies_loaded_configuration() {
        let config = Config::default()
            .with_finder_timeout(Duration::from_millis(250))
            .with_frame_sync(false);
        let driver =
            bootstrap_with(&StaticConfigLoader(config.clone()), parts()).expect("bootstrap");
        assert_eq!(driver.config(), &config);
        let context = driver.extension().context();
        assert_eq!(context.finder_timeout(), Duration::from_millis(250));
        assert!(!context.frame_sync());
        assert!(!driver.extension().registry().contains("RequestData"));
    }

    #[test]
    fn loaded_defaults_keep_frame_sync_and_offstage_filtering() {
        let driver = bootstrap_with(&ArgsConfigLoader(vec!["lookout"]), parts()).expect("bootstrap");
        assert!(driver.config().frame_sync());
        assert_eq!(Some(driver.telemetry()), crate::telemetry::installed());
        let context = driver.extension().context();
        assert!(context.frame_sync());
        assert!(context.policy().skip_offstage);
        assert_eq!(context.finder_timeout(), Duration::ZERO);
    }

    #[test]
    fn surfaces_configuration_failures() {
        let result = bootstrap_with(&FailingConfigLoader, parts());
        assert!(matches!(result, Err(BootstrapError::Configuration { .. })));
    }
}
