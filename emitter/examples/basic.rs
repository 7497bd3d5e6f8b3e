//! 基本用法示例：类型处理器、绑定上下文、通配符与注销
use emitter::{Emitter, EventType, Handler};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Greeter {
    id: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .init();

    let emitter: Emitter<&str, i32, Greeter, &str> = Emitter::default();

    let greet = Handler::typed(|ctx: Option<&Greeter>, event: Option<&i32>, args: &[&str]| {
        println!("greeter={:?} event={event:?} args={args:?}", ctx.map(|g| g.id));
        Ok(())
    });
    emitter.on_with_context("foo", greet.clone(), Greeter { id: 1 });

    emitter.on(
        EventType::Wildcard,
        Handler::wildcard(|_, ty: &EventType<&str>, event: Option<&i32>, args: &[&str]| {
            println!("* saw type={ty} event={event:?} args={args:?}");
            Ok(())
        }),
    );

    emitter.emit("foo", Some(&42), &["extra"])?;
    emitter.emit("bar", None, &[])?;

    emitter.off("foo", Some(&greet));
    emitter.emit("foo", Some(&43), &[])?;

    println!("{emitter:?}");
    Ok(())
}
