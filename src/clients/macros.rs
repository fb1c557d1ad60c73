/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// The parameter names must match the fields of the request variant.
macro_rules! client_method {
    ($client:ty => $vis:vis fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            $vis async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $crate::inventory::InventoryError> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| $crate::inventory::InventoryError::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| $crate::inventory::InventoryError::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}
