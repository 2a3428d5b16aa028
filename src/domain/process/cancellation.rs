use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 実行中の子プロセスを打ち切るためのトークン。
///
/// クローンしたハンドルはすべて同じフラグを共有する。一度キャンセルすると元には戻らない。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
