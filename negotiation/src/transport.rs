//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


use bytes::{BufMut, BytesMut};

/// Byte sink the engines write outbound frames through.
///
/// Engines never own a transport; every call that may write borrows one. A failed write is
/// returned to the caller as-is and never retried.
pub trait Transport {
    /// Writes one complete frame.
    fn write(&mut self, buf: &[u8]) -> std::io::Result<()>;
}

impl Transport for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

impl Transport for BytesMut {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.reserve(buf.len());
        self.put_slice(buf);
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<()> {
        (**self).write(buf)
    }
}
