use multiversx_sc::proxy_imports::*;

/// Time-weighted price oracle exposing tick cumulatives.
pub struct OracleProxy;

impl<Env, From, To, Gas> TxProxyTrait<Env, From, To, Gas> for OracleProxy
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    type TxProxyMethods = OracleProxyMethods<Env, From, To, Gas>;

    fn proxy_methods(self, tx: Tx<Env, From, To, (), Gas, (), ()>) -> Self::TxProxyMethods {
        OracleProxyMethods { wrapped_tx: tx }
    }
}

pub struct OracleProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    wrapped_tx: Tx<Env, From, To, (), Gas, (), ()>,
}

impl<Env, From, To, Gas> OracleProxyMethods<Env, From, To, Gas>
where
    Env: TxEnv,
    Env::Api: VMApi,
    From: TxFrom<Env>,
    To: TxTo<Env>,
    Gas: TxGas<Env>,
{
    /// Tick cumulatives at each of `seconds_agos`, in request order.
    pub fn observe<Arg0: ProxyArg<MultiValueEncoded<Env::Api, u64>>>(
        self,
        seconds_agos: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, MultiValueEncoded<Env::Api, i64>> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("observe")
            .argument(&seconds_agos)
            .original_result()
    }

    pub fn increase_observation_cardinality_next<Arg0: ProxyArg<u64>>(
        self,
        cardinality: Arg0,
    ) -> TxTypedCall<Env, From, To, NotPayable, Gas, ()> {
        self.wrapped_tx
            .payment(NotPayable)
            .raw_call("increaseObservationCardinalityNext")
            .argument(&cardinality)
            .original_result()
    }
}
