use std::io;

use tokio::signal;

#[cfg(target_family = "windows")]
pub async fn terminate() -> io::Result<()> {
    signal::ctrl_c().await
}

/// ctrl + c 发送的是 SIGINT 信号，docker stop 发送的是 SIGTERM 信号，都需要处理
#[cfg(target_family = "unix")]
pub async fn terminate() -> io::Result<()> {
    use tokio::select;

    let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    let mut int = signal::unix::signal(signal::unix::SignalKind::interrupt())?;
    select! {
        _ = term.recv() => Ok(()),
        _ = int.recv() => Ok(()),
    }
}

/// 等待一次配置重载信号，windows 下没有 SIGHUP，永远不会返回
pub struct ReloadSignal {
    #[cfg(target_family = "unix")]
    inner: signal::unix::Signal,
}

impl ReloadSignal {
    #[cfg(target_family = "unix")]
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            inner: signal::unix::signal(signal::unix::SignalKind::hangup())?,
        })
    }

    #[cfg(target_family = "windows")]
    pub fn new() -> io::Result<Self> {
        Ok(Self {})
    }

    #[cfg(target_family = "unix")]
    pub async fn recv(&mut self) -> Option<()> {
        self.inner.recv().await
    }

    #[cfg(target_family = "windows")]
    pub async fn recv(&mut self) -> Option<()> {
        std::future::pending().await
    }
}
