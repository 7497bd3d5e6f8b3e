//! 注册表（Registry）
//!
//! 事件类型到有序注册序列的映射，是发射器的全部状态。
//! 序列内的插入顺序即调用顺序；不同事件类型之间的顺序无意义。
//!
//! 注册表以 `SharedRegistry`（`Rc<RefCell<..>>`）共享：
//! 同一个句柄可以交给多个发射器，也可以在外部直接检查、预填或清空。
//!
use crate::event_type::EventType;
use crate::handler::Registration;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 事件类型 → 注册序列
pub type Registry<K, E, C = (), A = ()> = HashMap<EventType<K>, Vec<Registration<K, E, C, A>>>;

/// 单线程共享的注册表句柄
pub type SharedRegistry<K, E, C = (), A = ()> = Rc<RefCell<Registry<K, E, C, A>>>;

/// 用已有的映射创建共享句柄
///
/// ```
/// use emitter::{Emitter, EventType, Handler, Registration, registry};
/// use std::collections::HashMap;
///
/// let mut seed = HashMap::new();
/// seed.insert(
///     EventType::Named("ready"),
///     vec![Registration::new(Handler::typed(|_, _, _| Ok(())), None)],
/// );
///
/// let emitter: Emitter<&str, ()> = Emitter::with_registry(registry::shared(seed));
/// assert_eq!(emitter.handler_count("ready"), 1);
/// ```
pub fn shared<K, E, C, A>(registry: Registry<K, E, C, A>) -> SharedRegistry<K, E, C, A> {
    Rc::new(RefCell::new(registry))
}
