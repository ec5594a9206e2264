//! Chat Room Client - console collaborator
//!
//! Thin I/O glue around the wire protocol: prompts for a nickname, sends
//! the join line, forwards each console line as chat text, and prints
//! every server broadcast. The literal sentinel `_bye_` requests
//! departure.

use std::env;
use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;

use chat_room::protocol;
use chat_room::ClientId;

/// Default server address
const DEFAULT_ADDR: &str = "127.0.0.1:12345";

/// Console keyword that requests departure
const EXIT_SENTINEL: &str = "_bye_";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    let stream = TcpStream::connect(&addr).await?;
    let (read_half, mut write_half) = stream.into_split();

    let id = ClientId::generate();

    // Print server broadcasts as they arrive; protocol lines are the UI
    let print_task = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("{}", line);
        }
    });

    let mut console = BufReader::new(tokio::io::stdin()).lines();

    print!("请输入您的昵称：");
    std::io::stdout().flush()?;
    let name = match console.next_line().await? {
        Some(line) => line.trim().to_string(),
        None => return Ok(()),
    };

    send_line(&mut write_half, protocol::encode_join(&id, &name)).await?;

    while let Some(line) = console.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        if message == EXIT_SENTINEL {
            send_line(&mut write_half, protocol::encode_exit(&id)).await?;
            println!("你已退出群聊");
            break;
        }

        send_line(&mut write_half, protocol::encode_words(&id, message)).await?;
    }

    print_task.abort();

    Ok(())
}

/// Write one newline-terminated protocol line
async fn send_line(writer: &mut OwnedWriteHalf, line: String) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
