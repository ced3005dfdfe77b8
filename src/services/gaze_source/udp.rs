use crate::error::Result;
use crate::events::{GazeSample, Validity};
use crate::{debug_if_enabled, gaze_error};
use std::net::{SocketAddr, UdpSocket as StdUdpSocket};
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use super::{GazeSource, SampleReceiver};

const MAX_DATAGRAM: usize = 256;
/// Координаты дальше этого значения не могут быть точкой экрана
const MAX_COORDINATE: f64 = (i32::MAX / 2) as f64;

/// Отсчёты приходят UDP датаграммами от моста к трекеру: `x y [validity]`
pub struct UdpGazeSource {
    addr: SocketAddr,
    socket: Option<StdUdpSocket>,
    task: Option<JoinHandle<()>>,
}

impl UdpGazeSource {
    /// Открывает сокет сразу: соединение существует ещё до подписки
    pub fn connect(addr: SocketAddr) -> Result<Self> {
        info!("Открытие UDP источника взгляда на {}", addr);

        let socket = StdUdpSocket::bind(addr)
            .map_err(|e| gaze_error!(gaze_source, "Не удалось открыть {}: {}", addr, e))?;
        socket.set_nonblocking(true)?;

        Ok(Self {
            addr,
            socket: Some(socket),
            task: None,
        })
    }

    async fn receive_loop(socket: UdpSocket, tx: watch::Sender<Option<GazeSample>>) {
        let mut buf = [0u8; MAX_DATAGRAM];

        loop {
            match socket.recv_from(&mut buf).await {
                Ok((len, peer)) => match parse_datagram(&buf[..len]) {
                    Some(sample) => {
                        debug_if_enabled!("Отсчёт от {}: {}", peer, sample);
                        tx.send_replace(Some(sample));
                    }
                    None => {
                        debug!("Пропуск некорректной датаграммы от {}", peer);
                    }
                },
                Err(e) => {
                    warn!("Ошибка чтения UDP: {}", e);
                    sleep(Duration::from_millis(100)).await;
                }
            }

            if tx.is_closed() {
                debug!("Получатель отсчётов закрыт, останавливаем приём");
                break;
            }
        }
    }
}

/// Разбор датаграммы `x y [validity]`, разделители пробелы или запятые
pub fn parse_datagram(payload: &[u8]) -> Option<GazeSample> {
    let text = std::str::from_utf8(payload).ok()?;
    let mut fields = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|field| !field.is_empty());

    let x: f64 = fields.next()?.parse().ok()?;
    let y: f64 = fields.next()?.parse().ok()?;
    if !is_coordinate(x) || !is_coordinate(y) {
        return None;
    }

    let sample = GazeSample::new(x, y);
    match fields.next() {
        Some(validity) => Some(sample.with_validity(Validity(validity.parse().ok()?))),
        None => Some(sample),
    }
}

fn is_coordinate(value: f64) -> bool {
    value.is_finite() && value.abs() <= MAX_COORDINATE
}

#[async_trait::async_trait]
impl GazeSource for UdpGazeSource {
    async fn subscribe(&mut self) -> Result<SampleReceiver> {
        let socket = self
            .socket
            .take()
            .ok_or_else(|| gaze_error!(gaze_source, "Источник уже подписан или освобождён"))?;
        let socket = UdpSocket::from_std(socket)?;

        let (tx, rx) = watch::channel(None);
        self.task = Some(tokio::spawn(Self::receive_loop(socket, tx)));

        info!("Подписка на поток взгляда {} активна", self.addr);
        Ok(rx)
    }

    fn disable(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.socket = None;
        info!("UDP источник взгляда {} закрыт", self.addr);
    }
}
