use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info, warn};

use crate::command::Command;

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The TCP side of the controller.
///
/// Listens on one port, accepts one robot, and pushes command strings to it
/// at whatever cadence the caller drives. There is no acknowledgement for a
/// command; the next periodic send is the only retry. The robot may write
/// bytes back, which count as a liveness sign and nothing more.
///
/// The accept thread is the only writer of the client slot on connect; the
/// control-loop thread only reads it to send, and clears it on disconnect,
/// on a send error, or when the robot hangs up.
pub struct CommandLink {
    client: Arc<Mutex<Option<TcpStream>>>,
    connected: Arc<AtomicBool>,
    stop_accepting: Arc<AtomicBool>,
    accept_thread: Option<JoinHandle<()>>,
    port: u16,
}

impl CommandLink {
    /// Binds `port` and starts the background accept thread.
    ///
    /// A port that cannot be bound is fatal for the session; there is no
    /// retry with another port.
    pub fn start_listening(port: u16) -> Result<Self, LinkError> {
        let listener = TcpListener::bind(("0.0.0.0", port))?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();
        info!("listening for the robot on port {}", port);

        let client = Arc::new(Mutex::new(None));
        let connected = Arc::new(AtomicBool::new(false));
        let stop_accepting = Arc::new(AtomicBool::new(false));

        let accept_thread = {
            let client = Arc::clone(&client);
            let connected = Arc::clone(&connected);
            let stop_accepting = Arc::clone(&stop_accepting);
            std::thread::spawn(move || accept_loop(listener, client, connected, stop_accepting))
        };

        Ok(CommandLink {
            client,
            connected,
            stop_accepting,
            accept_thread: Some(accept_thread),
            port,
        })
    }

    /// The port actually bound (useful when constructed with port 0).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// True while an accepted robot connection is live.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Formats the triple and pushes it to the robot in a single write.
    ///
    /// Returns `LinkError::NotConnected` when no robot is connected. A write
    /// error drops the client so the accept thread can take a new one.
    pub fn send_command(&self, command: Command) -> Result<(), LinkError> {
        let mut client = self.client.lock().unwrap();
        let stream = match client.as_mut() {
            Some(stream) => stream,
            None => return Err(LinkError::NotConnected),
        };
        match stream.write_all(command.format().as_bytes()) {
            Ok(()) => Ok(()),
            Err(error) => {
                warn!("send failed, dropping the robot connection: {}", error);
                *client = None;
                self.connected.store(false, Ordering::SeqCst);
                Err(LinkError::Io(error))
            }
        }
    }

    /// Non-blocking read on the robot socket.
    ///
    /// Whatever the robot sends back is discarded after being counted as a
    /// liveness sign. End of stream or a read error means the robot is gone:
    /// the client slot is cleared and the listener can accept again.
    pub fn poll_peer(&self) -> Result<(), LinkError> {
        let mut client = self.client.lock().unwrap();
        let stream = match client.as_mut() {
            Some(stream) => stream,
            None => return Err(LinkError::NotConnected),
        };
        stream.set_nonblocking(true)?;
        let mut buffer = [0u8; 128];
        let result = stream.read(&mut buffer);
        match result {
            Ok(0) => {
                info!("robot closed the connection");
                *client = None;
                self.connected.store(false, Ordering::SeqCst);
                Ok(())
            }
            Ok(count) => {
                debug!("robot sent {} bytes", count);
                stream.set_nonblocking(false)?;
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::WouldBlock => {
                stream.set_nonblocking(false)?;
                Ok(())
            }
            Err(error) => {
                warn!("receive failed, dropping the robot connection: {}", error);
                *client = None;
                self.connected.store(false, Ordering::SeqCst);
                Err(LinkError::Io(error))
            }
        }
    }

    /// Closes the robot connection. The listener keeps accepting, so a new
    /// robot can connect afterwards.
    pub fn disconnect(&self) {
        let mut client = self.client.lock().unwrap();
        if let Some(stream) = client.take() {
            let _ = stream.shutdown(Shutdown::Both);
            info!("robot connection closed");
        }
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Stops the accept thread, joins it and closes the connection.
    pub fn shutdown(&mut self) {
        self.stop_accepting.store(true, Ordering::SeqCst);
        if let Some(handle) = self.accept_thread.take() {
            if handle.join().is_err() {
                warn!("accept thread panicked");
            }
        }
        self.disconnect();
    }
}

impl Drop for CommandLink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn accept_loop(
    listener: TcpListener,
    client: Arc<Mutex<Option<TcpStream>>>,
    connected: Arc<AtomicBool>,
    stop_accepting: Arc<AtomicBool>,
) {
    while !stop_accepting.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, address)) => {
                if connected.load(Ordering::SeqCst) {
                    // one robot at a time, later connectors are turned away
                    info!("refusing connection from {}, a robot is already connected", address);
                    let _ = stream.shutdown(Shutdown::Both);
                    continue;
                }
                info!("robot connected from {}", address);
                *client.lock().unwrap() = Some(stream);
                connected.store(true, Ordering::SeqCst);
            }
            Err(error) if error.kind() == ErrorKind::WouldBlock => {
                std::thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(error) => {
                warn!("accept failed: {}", error);
                std::thread::sleep(ACCEPT_POLL_INTERVAL);
            }
        }
    }
}

#[derive(Debug)]
pub enum LinkError {
    /// No robot is connected, nothing was sent.
    NotConnected,
    /// The socket failed during a send or receive.
    Io(std::io::Error),
}

impl From<std::io::Error> for LinkError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl std::fmt::Display for LinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkError::NotConnected => write!(f, "no robot connected"),
            LinkError::Io(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for LinkError {}
