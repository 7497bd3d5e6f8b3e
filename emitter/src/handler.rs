//! 事件处理器（Handler）与注册项（Registration）
//!
//! 处理器分两种形态，仅调用签名不同：
//! - 类型处理器：`handler(ctx, event, args)`；
//! - 通配符处理器：`handler(ctx, event_type, event, args)`，额外接收事件类型。
//!
//! 处理器以 `Rc` 持有，克隆只复制引用；相等性按引用判断，
//! 这也是 `Emitter::off` 定位待移除注册项的依据。
//!
use crate::event_type::EventType;
use std::fmt;
use std::rc::Rc;

/// 处理器返回值：`Err` 会原样从 `emit` 返回并中断本次投递
pub type HandlerResult = anyhow::Result<()>;

/// 类型处理器签名：`(上下文, 事件, 额外参数)`
pub type TypedFn<E, C, A> = dyn Fn(Option<&C>, Option<&E>, &[A]) -> HandlerResult;

/// 通配符处理器签名：`(上下文, 事件类型, 事件, 额外参数)`
pub type WildcardFn<K, E, C, A> =
    dyn Fn(Option<&C>, &EventType<K>, Option<&E>, &[A]) -> HandlerResult;

/// 事件处理器
pub enum Handler<K, E, C = (), A = ()> {
    Typed(Rc<TypedFn<E, C, A>>),
    Wildcard(Rc<WildcardFn<K, E, C, A>>),
}

impl<K, E, C, A> Handler<K, E, C, A> {
    /// 以闭包创建类型处理器
    pub fn typed<F>(f: F) -> Self
    where
        F: Fn(Option<&C>, Option<&E>, &[A]) -> HandlerResult + 'static,
    {
        Self::Typed(Rc::new(f))
    }

    /// 以闭包创建通配符处理器
    pub fn wildcard<F>(f: F) -> Self
    where
        F: Fn(Option<&C>, &EventType<K>, Option<&E>, &[A]) -> HandlerResult + 'static,
    {
        Self::Wildcard(Rc::new(f))
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard(_))
    }

    /// 引用相等：同一次创建（及其克隆）才视为同一个处理器
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Typed(a), Self::Typed(b)) => Rc::ptr_eq(a, b),
            (Self::Wildcard(a), Self::Wildcard(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// 按自身形态调用处理器
    ///
    /// 注册项在哪一轮被调用都遵循自身签名：类型处理器忽略 `event_type`。
    pub(crate) fn call(
        &self,
        ctx: Option<&C>,
        event_type: &EventType<K>,
        event: Option<&E>,
        args: &[A],
    ) -> HandlerResult {
        match self {
            Self::Typed(f) => f(ctx, event, args),
            Self::Wildcard(f) => f(ctx, event_type, event, args),
        }
    }
}

impl<K, E, C, A> Clone for Handler<K, E, C, A> {
    fn clone(&self) -> Self {
        match self {
            Self::Typed(f) => Self::Typed(Rc::clone(f)),
            Self::Wildcard(f) => Self::Wildcard(Rc::clone(f)),
        }
    }
}

impl<K, E, C, A> PartialEq for Handler<K, E, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<K, E, C, A> Eq for Handler<K, E, C, A> {}

impl<K, E, C, A> fmt::Debug for Handler<K, E, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(h) => write!(f, "Handler::Typed({:p})", Rc::as_ptr(h) as *const ()),
            Self::Wildcard(h) => write!(f, "Handler::Wildcard({:p})", Rc::as_ptr(h) as *const ()),
        }
    }
}

/// 注册项：处理器 + 可选的执行上下文
///
/// 上下文以 `Rc` 保存，投递前快照注册序列时无需 `C: Clone`。
pub struct Registration<K, E, C = (), A = ()> {
    handler: Handler<K, E, C, A>,
    context: Option<Rc<C>>,
}

impl<K, E, C, A> Registration<K, E, C, A> {
    pub fn new(handler: Handler<K, E, C, A>, context: Option<Rc<C>>) -> Self {
        Self { handler, context }
    }

    pub fn handler(&self) -> &Handler<K, E, C, A> {
        &self.handler
    }

    pub fn context(&self) -> Option<&C> {
        self.context.as_deref()
    }

    pub(crate) fn invoke(
        &self,
        event_type: &EventType<K>,
        event: Option<&E>,
        args: &[A],
    ) -> HandlerResult {
        self.handler.call(self.context(), event_type, event, args)
    }
}

impl<K, E, C, A> Clone for Registration<K, E, C, A> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            context: self.context.clone(),
        }
    }
}

impl<K, E, C: fmt::Debug, A> fmt::Debug for Registration<K, E, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("handler", &self.handler)
            .field("context", &self.context)
            .finish()
    }
}
