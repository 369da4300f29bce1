// Copyright (C) 2024 Wodi contributors
//
// This file is part of Wodi.
//
// Wodi is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Wodi is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Wodi.  If not, see <http://www.gnu.org/licenses/>.

//! Reading and writing whole command-list blocks from byte streams.
//!
//! Both flavours buffer the block in memory: the async functions only suspend while the stream
//! is read or written, never halfway through decoding.

use std::io::{Read, Write};

use crate::binary::TextEncoding;
use crate::commands::EventCommandList;
use crate::Result;

pub fn read_command_list(mut reader: impl Read, encoding: TextEncoding) -> Result<EventCommandList> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    EventCommandList::from_bytes(&bytes, encoding)
}

pub fn write_command_list(
    mut writer: impl Write,
    list: &EventCommandList,
    encoding: TextEncoding,
) -> Result<()> {
    let bytes = list.to_bytes(encoding)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

pub async fn read_command_list_async(
    mut reader: impl futures_lite::AsyncRead + Unpin,
    encoding: TextEncoding,
) -> Result<EventCommandList> {
    use futures_lite::AsyncReadExt;

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await?;
    EventCommandList::from_bytes(&bytes, encoding)
}

pub async fn write_command_list_async(
    mut writer: impl futures_lite::AsyncWrite + Unpin,
    list: &EventCommandList,
    encoding: TextEncoding,
) -> Result<()> {
    use futures_lite::AsyncWriteExt;

    let bytes = list.to_bytes(encoding)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
