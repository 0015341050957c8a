//! Service stubs: name-and-types records pairing an RPC's request and
//! response messages. No transport is provided; callers supply a
//! byte-in/byte-out function.

use core::marker::PhantomData;

use crate::error::DecodeError;
use crate::message::Message;
use crate::reader::Reader;

/// One RPC declaration: the qualified method name plus its request and
/// response message types.
pub struct Rpc<Req, Res> {
    pub package: &'static str,
    pub service: &'static str,
    pub method: &'static str,
    _types: PhantomData<fn(Req) -> Res>,
}

impl<Req: Message, Res: Message> Rpc<Req, Res> {
    pub const fn new(
        package: &'static str,
        service: &'static str,
        method: &'static str,
    ) -> Rpc<Req, Res> {
        Rpc {
            package,
            service,
            method,
            _types: PhantomData,
        }
    }

    /// The gRPC-style path, `/package.Service/Method`.
    pub fn path(&self) -> String {
        if self.package.is_empty() {
            format!("/{}/{}", self.service, self.method)
        } else {
            format!("/{}.{}/{}", self.package, self.service, self.method)
        }
    }

    /// Runs one exchange through a caller-supplied transport: the request is
    /// encoded, the transport maps bytes to bytes, and the response decodes.
    pub fn call<F>(&self, mut transport: F, request: &Req) -> Result<Res, DecodeError>
    where
        F: FnMut(&[u8]) -> Vec<u8>,
    {
        let encoded = request.to_proto().contents();
        let response = transport(&encoded);
        Res::from_proto(&mut Reader::new(&response))
    }
}
