//! 进程内事件发射器（emitter）
//!
//! 提供最小化的同步发布/订阅能力：
//! - 按事件类型（`EventType`）注册处理器，或注册到通配符上接收全部事件；
//! - 注册时可绑定执行上下文（context），调用时作为处理器的接收者传入；
//! - `emit` 同步调用所有匹配的处理器，先类型匹配、后通配符，并转发额外参数。
//!
//! 本 crate 只面向单线程协作式场景：注册表以 `Rc<RefCell<..>>` 持有，
//! 不做跨线程同步，也不做持久化、异步投递或重放。
//!
//! 典型用法：
//! ```
//! use emitter::{Emitter, EventType, Handler};
//!
//! let emitter: Emitter<&str, i32> = Emitter::default();
//! let on_foo = Handler::typed(|_ctx, event: Option<&i32>, _args| {
//!     assert_eq!(event, Some(&42));
//!     Ok(())
//! });
//! emitter.on("foo", on_foo.clone());
//! emitter.on(EventType::Wildcard, Handler::wildcard(|_ctx, ty: &EventType<&str>, _event, _args| {
//!     assert_eq!(ty, &EventType::Named("foo"));
//!     Ok(())
//! }));
//!
//! emitter.emit("foo", Some(&42), &[]).unwrap();
//! emitter.off("foo", Some(&on_foo));
//! assert_eq!(emitter.handler_count("foo"), 0);
//! ```
//!
pub mod emitter;
pub mod event_type;
pub mod handler;
pub mod registry;

pub use emitter::Emitter;
pub use event_type::EventType;
pub use handler::{Handler, HandlerResult, Registration, TypedFn, WildcardFn};
pub use registry::{Registry, SharedRegistry};
