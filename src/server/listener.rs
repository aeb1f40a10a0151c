use std::net::SocketAddr;
use std::sync::Arc;

use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::handler::RequestHandler;
use super::Result;

/// TCP 연결을 수락해 요청 핸들러에 넘기는 리스너입니다.
///
/// 연결마다 태스크를 하나씩 생성합니다. 레지스트리와 컨텍스트는 시작
/// 이후 읽기 전용이므로 태스크 사이에 잠금이 필요 없습니다.
pub struct ServerListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl ServerListener {
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            error!(error = %e, addr = %addr, "포트 바인딩 실패");
            e
        })?;
        let local_addr = listener.local_addr()?;

        info!(addr = %local_addr, "HTTP 리스너 시작");

        Ok(Self {
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn run(self, handler: Arc<RequestHandler>) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        if let Err(err) = handler.handle_connection(io).await {
                            error!(error = %err, "연결 처리 실패");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "연결 수락 실패");
                }
            }
        }
    }
}
