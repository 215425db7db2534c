use bindery::{global, ContainerBuilder, DiError, Dispose, Resolver};
use serial_test::serial;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

fn counting_builder(inits: &AtomicUsize) -> bindery::DiResult<ContainerBuilder> {
    inits.fetch_add(1, Ordering::SeqCst);
    let mut builder = ContainerBuilder::new();
    builder.bind::<String>().to_instance(Arc::new("global".into()))?;
    Ok(builder)
}

#[test]
#[serial]
fn first_access_builds_once() {
    global::teardown();
    let inits = AtomicUsize::new(0);

    let a = global::get_or_init(|| counting_builder(&inits)).unwrap();
    let b = global::get_or_init(|| counting_builder(&inits)).unwrap();

    assert_eq!(inits.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&a.resolve::<String>().unwrap(), &b.resolve::<String>().unwrap()));
    assert!(global::container().is_some());

    assert!(global::teardown());
}

#[test]
#[serial]
fn teardown_disposes_and_allows_rebuild() {
    struct Socket {
        closed: Arc<AtomicBool>,
    }

    impl Dispose for Socket {
        fn dispose(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }
    }

    global::teardown();
    let closed = Arc::new(AtomicBool::new(false));
    let flag = closed.clone();

    let container = global::get_or_init(move || {
        let mut builder = ContainerBuilder::new();
        builder.bind::<Socket>().to_single_method(move |ctx| {
            let socket = Arc::new(Socket { closed: flag.clone() });
            ctx.register_disposer(socket.clone());
            Ok(socket)
        })?;
        Ok(builder)
    })
    .unwrap();
    container.resolve::<Socket>().unwrap();

    assert!(global::teardown());
    assert!(closed.load(Ordering::SeqCst));
    assert!(global::container().is_none());
    assert!(!global::teardown());

    let inits = AtomicUsize::new(0);
    global::get_or_init(|| counting_builder(&inits)).unwrap();
    assert_eq!(inits.load(Ordering::SeqCst), 1);
    global::teardown();
}

#[test]
#[serial]
fn failed_init_stores_nothing() {
    global::teardown();
    let result = global::get_or_init(|| {
        let shared = Arc::new(1u8);
        let mut builder = ContainerBuilder::new();
        builder.bind::<u8>().to_instance(shared.clone())?;
        builder.bind::<u8>().to_instance(shared)?;
        Ok(builder)
    });

    assert!(matches!(result, Err(DiError::DuplicateBinding { .. })));
    assert!(global::container().is_none());
}
