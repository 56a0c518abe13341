use crate::host::{unknown_function, ContractCode, Host, HostResult};
use donaswap_core::artifacts::event_emitter;
use donaswap_core::value::arg;
use donaswap_core::{Address, Value};

/// Test helper that calls a router and logs what it returned, so tests can
/// observe router results through events.
pub struct RouterEventEmitter;

impl ContractCode for RouterEventEmitter {
    fn construct(&self, _host: &mut Host<'_, '_>, _args: &[Value]) -> HostResult<()> {
        Ok(())
    }

    fn invoke(&self, host: &mut Host<'_, '_>, function: &str, args: &[Value]) -> HostResult<Value> {
        match function {
            event_emitter::FORWARD => {
                let router: Address = arg(function, args, 0)?;
                let target: String = arg(function, args, 1)?;
                let forwarded: Vec<Value> = arg(function, args, 2)?;
                let result = host.invoke(router, &target, forwarded)?;
                host.emit(event_emitter::AMOUNTS, vec![result]);
                Ok(Value::Void)
            }
            _ => Err(unknown_function(function)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::contracts::testutils::setup;
    use donaswap_core::artifacts::{self, event_emitter, router};
    use donaswap_core::{Address, EnvError, Value};

    #[tokio::test]
    async fn test_forward_emits_result() {
        let (_devnet, client) = setup().await;
        let factory = Address::Contract([1u8; 32]);
        let router02 = client
            .deploy(
                artifacts::ROUTER02,
                vec![factory.into(), Address::Contract([2u8; 32]).into()],
            )
            .await
            .unwrap();
        let emitter = client
            .deploy(artifacts::ROUTER_EVENT_EMITTER, vec![])
            .await
            .unwrap();

        let receipt = emitter
            .send(
                event_emitter::FORWARD,
                vec![
                    router02.address().into(),
                    router::FACTORY.into(),
                    Value::Vec(vec![]),
                ],
            )
            .await
            .unwrap();
        let event = receipt
            .events
            .iter()
            .find(|e| e.topic == event_emitter::AMOUNTS)
            .unwrap();
        assert_eq!(event.contract, emitter.address());
        assert_eq!(event.data, vec![Value::Address(factory)]);
    }

    #[tokio::test]
    async fn test_failed_forward_reverts_whole_call() {
        let (_devnet, client) = setup().await;
        let emitter = client
            .deploy(artifacts::ROUTER_EVENT_EMITTER, vec![])
            .await
            .unwrap();

        let err = emitter
            .send(
                event_emitter::FORWARD,
                vec![
                    emitter.address().into(),
                    event_emitter::FORWARD.into(),
                    Value::Vec(vec![]),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EnvError::Reverted(reason) if reason.starts_with("reentrant call")));
    }
}
