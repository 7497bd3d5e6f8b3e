//! 事件发射器（Emitter）
//!
//! 三个操作直接作用于同一个注册表：
//! - `on` / `on_with_context`：向事件类型的序列末尾追加注册项；
//! - `off`：移除第一个引用相同的注册项，或清空整个序列；
//! - `emit`：先调用类型匹配的处理器，再调用通配符处理器。
//!
//! 每一轮调用前都会对序列做快照并释放注册表借用，
//! 处理器在投递过程中可以重入 `on` / `off` / `emit`，只影响之后的投递。
//!
use crate::event_type::EventType;
use crate::handler::{Handler, HandlerResult, Registration};
use crate::registry::SharedRegistry;
use bon::bon;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

/// 同步的进程内事件发射器
///
/// - `K`：应用事件键；
/// - `E`：事件负载；
/// - `C`：注册时绑定的执行上下文；
/// - `A`：`emit` 转发给处理器的额外参数。
///
/// 克隆得到的发射器与原发射器共享同一个注册表。
pub struct Emitter<K, E, C = (), A = ()> {
    all: SharedRegistry<K, E, C, A>,
}

#[bon]
impl<K, E, C, A> Emitter<K, E, C, A> {
    /// 构建发射器；`all` 为空时从空注册表开始
    ///
    /// ```
    /// use emitter::{Emitter, registry};
    /// use std::collections::HashMap;
    ///
    /// let shared = registry::shared(HashMap::new());
    /// let a: Emitter<&str, u32> = Emitter::builder().all(shared.clone()).build();
    /// let b: Emitter<&str, u32> = Emitter::builder().all(shared).build();
    /// a.on("tick", emitter::Handler::typed(|_, _, _| Ok(())));
    /// assert_eq!(b.handler_count("tick"), 1);
    /// ```
    #[builder]
    pub fn new(all: Option<SharedRegistry<K, E, C, A>>) -> Self {
        Self {
            all: all.unwrap_or_default(),
        }
    }

    /// 以外部提供的注册表构建，用于共享或恢复状态
    pub fn with_registry(all: SharedRegistry<K, E, C, A>) -> Self {
        Self::builder().all(all).build()
    }

    /// 注册表句柄，可直接检查或修改（例如批量清空、预填）
    pub fn all(&self) -> &SharedRegistry<K, E, C, A> {
        &self.all
    }
}

impl<K, E, C, A> Emitter<K, E, C, A>
where
    K: Eq + Hash + fmt::Debug,
{
    /// 注册处理器（不绑定上下文）
    ///
    /// 同一个处理器重复注册会产生两个独立的注册项，都会被调用。
    pub fn on(&self, event_type: impl Into<EventType<K>>, handler: Handler<K, E, C, A>) {
        self.register(event_type.into(), Registration::new(handler, None));
    }

    /// 注册处理器，并在调用时把 `context` 作为接收者传入
    pub fn on_with_context(
        &self,
        event_type: impl Into<EventType<K>>,
        handler: Handler<K, E, C, A>,
        context: impl Into<Rc<C>>,
    ) {
        self.register(
            event_type.into(),
            Registration::new(handler, Some(context.into())),
        );
    }

    fn register(&self, event_type: EventType<K>, registration: Registration<K, E, C, A>) {
        tracing::trace!(
            event_type = ?event_type,
            wildcard = registration.handler().is_wildcard(),
            bound = registration.context().is_some(),
            "registering handler"
        );

        let mut all = self.all.borrow_mut();
        all.entry(event_type).or_default().push(registration);
    }

    /// 注销处理器
    ///
    /// - `Some(handler)`：移除序列中第一个引用相同的注册项；找不到时不做任何修改；
    /// - `None`：将该类型的序列替换为空序列，键本身保留。
    ///
    /// 事件类型从未注册过时直接返回。
    pub fn off(&self, event_type: impl Into<EventType<K>>, handler: Option<&Handler<K, E, C, A>>) {
        let event_type: EventType<K> = event_type.into();
        let mut all = self.all.borrow_mut();
        let Some(handlers) = all.get_mut(&event_type) else {
            return;
        };

        match handler {
            Some(handler) => {
                match handlers.iter().position(|r| r.handler().ptr_eq(handler)) {
                    Some(index) => {
                        handlers.remove(index);
                        tracing::trace!(event_type = ?event_type, index, "handler removed");
                    }
                    None => {
                        tracing::trace!(event_type = ?event_type, "handler not registered");
                    }
                }
            }
            None => {
                let removed = std::mem::take(handlers).len();
                tracing::debug!(event_type = ?event_type, removed, "handlers cleared");
            }
        }
    }

    /// 触发事件
    ///
    /// 1. 对 `event_type` 的序列做快照，按插入顺序调用；
    /// 2. 再对通配符序列做快照，按插入顺序调用；
    ///
    /// 每个注册项按自身形态调用：类型处理器收到 `(ctx, event, args)`，
    /// 通配符处理器收到 `(ctx, event_type, event, args)`。
    ///
    /// 处理器返回的第一个错误原样返回，本轮与通配符轮中剩余的处理器不再调用。
    /// 直接触发通配符键只会调用通配符序列（两轮各一次），不会广播给类型处理器。
    pub fn emit(
        &self,
        event_type: impl Into<EventType<K>>,
        event: Option<&E>,
        args: &[A],
    ) -> HandlerResult {
        let event_type: EventType<K> = event_type.into();

        if let Some(handlers) = self.snapshot(&event_type) {
            tracing::trace!(event_type = ?event_type, handlers = handlers.len(), "dispatching");
            for registration in &handlers {
                registration.invoke(&event_type, event, args)?;
            }
        }

        if let Some(handlers) = self.snapshot(&EventType::Wildcard) {
            tracing::trace!(
                event_type = ?event_type,
                handlers = handlers.len(),
                "dispatching to wildcard"
            );
            for registration in &handlers {
                registration.invoke(&event_type, event, args)?;
            }
        }

        Ok(())
    }

    /// 某事件类型当前的注册项数量
    pub fn handler_count(&self, event_type: impl Into<EventType<K>>) -> usize {
        let event_type: EventType<K> = event_type.into();
        self.all.borrow().get(&event_type).map_or(0, Vec::len)
    }

    fn snapshot(&self, event_type: &EventType<K>) -> Option<Vec<Registration<K, E, C, A>>> {
        self.all.borrow().get(event_type).cloned()
    }
}

impl<K, E, C, A> Emitter<K, E, C, A>
where
    K: Eq + Hash + Clone,
{
    /// 注册表中已有的事件类型（包括已被清空的序列）
    pub fn registered_types(&self) -> Vec<EventType<K>> {
        self.all.borrow().keys().cloned().collect()
    }
}

impl<K, E, C, A> Default for Emitter<K, E, C, A> {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<K, E, C, A> Clone for Emitter<K, E, C, A> {
    fn clone(&self) -> Self {
        Self {
            all: Rc::clone(&self.all),
        }
    }
}

impl<K: fmt::Debug, E, C, A> fmt::Debug for Emitter<K, E, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Emitter");
        match self.all.try_borrow() {
            Ok(all) => out.field(
                "all",
                &all.iter()
                    .map(|(ty, handlers)| (ty, handlers.len()))
                    .collect::<Vec<_>>(),
            ),
            Err(_) => out.field("all", &"<borrowed>"),
        };
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use std::cell::RefCell;
    use std::collections::HashMap;

    type Log = Rc<RefCell<Vec<String>>>;
    type TestEmitter = Emitter<&'static str, u32>;

    fn recorder(log: &Log, name: &'static str) -> Handler<&'static str, u32> {
        let log = log.clone();
        Handler::typed(move |_, event: Option<&u32>, _| {
            log.borrow_mut().push(format!("{name}:{}", event.copied().unwrap_or_default()));
            Ok(())
        })
    }

    #[test]
    fn off_unknown_type_does_not_create_key() {
        let emitter = TestEmitter::default();
        let log = Log::default();

        emitter.off("missing", None);
        emitter.off("missing", Some(&recorder(&log, "h")));

        assert!(emitter.all().borrow().is_empty());
        assert!(emitter.registered_types().is_empty());
    }

    #[test]
    fn off_all_keeps_key_with_empty_sequence() {
        let emitter = TestEmitter::default();
        let log = Log::default();
        emitter.on("foo", recorder(&log, "a"));
        emitter.on("foo", recorder(&log, "b"));

        emitter.off("foo", None);

        let all = emitter.all().borrow();
        assert_eq!(all.get(&EventType::Named("foo")).map(Vec::len), Some(0));
    }

    #[test]
    fn off_not_found_never_removes_another_entry() {
        let emitter = TestEmitter::default();
        let log = Log::default();
        let first = recorder(&log, "first");
        let last = recorder(&log, "last");
        emitter.on("foo", first.clone());
        emitter.on("foo", last.clone());

        emitter.off("foo", Some(&recorder(&log, "stranger")));

        let all = emitter.all().borrow();
        let handlers = &all[&EventType::Named("foo")];
        assert_eq!(handlers.len(), 2);
        assert!(handlers[0].handler().ptr_eq(&first));
        assert!(handlers[1].handler().ptr_eq(&last));
    }

    #[test]
    fn off_removes_first_match_only() {
        let emitter = TestEmitter::default();
        let log = Log::default();
        let dup = recorder(&log, "dup");
        let other = recorder(&log, "other");
        emitter.on("foo", dup.clone());
        emitter.on("foo", other.clone());
        emitter.on("foo", dup.clone());

        emitter.off("foo", Some(&dup));

        let all = emitter.all().borrow();
        let handlers = &all[&EventType::Named("foo")];
        assert_eq!(handlers.len(), 2);
        assert!(handlers[0].handler().ptr_eq(&other));
        assert!(handlers[1].handler().ptr_eq(&dup));
    }

    #[test]
    fn clones_and_seeded_emitters_share_registry() {
        let shared = registry::shared(HashMap::new());
        let a = TestEmitter::with_registry(shared.clone());
        let b = a.clone();
        let c: TestEmitter = Emitter::builder().all(shared.clone()).build();
        let log = Log::default();

        a.on("tick", recorder(&log, "a"));
        b.emit("tick", Some(&1), &[]).unwrap();
        c.emit("tick", Some(&2), &[]).unwrap();

        assert_eq!(*log.borrow(), vec!["a:1", "a:2"]);
        assert_eq!(shared.borrow().len(), 1);
    }

    #[test]
    fn independent_emitters_do_not_share_state() {
        let a = TestEmitter::default();
        let b = TestEmitter::default();
        let log = Log::default();

        a.on("tick", recorder(&log, "a"));
        b.emit("tick", Some(&1), &[]).unwrap();

        assert!(log.borrow().is_empty());
        assert_eq!(b.handler_count("tick"), 0);
    }

    #[test]
    fn direct_registry_manipulation_is_observed() {
        let emitter = TestEmitter::default();
        let log = Log::default();
        emitter.on("foo", recorder(&log, "a"));

        emitter.all().borrow_mut().clear();
        emitter.emit("foo", Some(&1), &[]).unwrap();
        assert!(log.borrow().is_empty());

        emitter
            .all()
            .borrow_mut()
            .insert("foo".into(), vec![Registration::new(recorder(&log, "b"), None)]);
        emitter.emit("foo", Some(&2), &[]).unwrap();
        assert_eq!(*log.borrow(), vec!["b:2"]);
    }

    #[test]
    fn emitting_wildcard_runs_wildcard_sequence_in_both_passes() {
        let emitter = TestEmitter::default();
        let log = Log::default();
        let sink = log.clone();
        emitter.on("foo", recorder(&log, "typed"));
        emitter.on(
            EventType::Wildcard,
            Handler::wildcard(move |_, ty: &EventType<&str>, _, _| {
                sink.borrow_mut().push(format!("wild:{ty}"));
                Ok(())
            }),
        );

        emitter.emit(EventType::Wildcard, Some(&1), &[]).unwrap();

        assert_eq!(*log.borrow(), vec!["wild:*", "wild:*"]);
    }

    #[test]
    fn debug_lists_counts_per_type() {
        let emitter = TestEmitter::default();
        let log = Log::default();
        emitter.on("foo", recorder(&log, "a"));

        let out = format!("{emitter:?}");
        assert!(out.contains("Named(\"foo\")"));
        assert!(out.contains('1'));
    }
}
