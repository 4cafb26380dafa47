//! Live gateway backed by the REST client.

use crate::gateway::{BoxFuture, Gateway};
use snipe_core::{AssetBalance, ExchangeInfo, OrderReport, Price, Qty};
use snipe_gateway::{GatewayResult, RestClient};

/// [`Gateway`] implementation that forwards every call to the
/// authenticated REST client.
pub struct LiveGateway {
    client: RestClient,
}

impl LiveGateway {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

impl Gateway for LiveGateway {
    fn server_time(&self) -> BoxFuture<'_, GatewayResult<u64>> {
        Box::pin(self.client.server_time())
    }

    fn exchange_info(&self) -> BoxFuture<'_, GatewayResult<ExchangeInfo>> {
        Box::pin(self.client.exchange_info())
    }

    fn ticker_price<'a>(&'a self, symbol: &'a str) -> BoxFuture<'a, GatewayResult<Price>> {
        Box::pin(self.client.ticker_price(symbol))
    }

    fn account_balances(&self) -> BoxFuture<'_, GatewayResult<Vec<AssetBalance>>> {
        Box::pin(self.client.account_balances())
    }

    fn place_limit_sell<'a>(
        &'a self,
        symbol: &'a str,
        quantity: Qty,
        price: Price,
        client_order_id: &'a str,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>> {
        Box::pin(
            self.client
                .place_limit_sell(symbol, quantity, price, client_order_id),
        )
    }

    fn get_order<'a>(
        &'a self,
        symbol: &'a str,
        order_id: u64,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>> {
        Box::pin(self.client.get_order(symbol, order_id))
    }

    fn get_order_by_client_id<'a>(
        &'a self,
        symbol: &'a str,
        client_order_id: &'a str,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>> {
        Box::pin(self.client.get_order_by_client_id(symbol, client_order_id))
    }

    fn cancel_order<'a>(
        &'a self,
        symbol: &'a str,
        order_id: u64,
    ) -> BoxFuture<'a, GatewayResult<OrderReport>> {
        Box::pin(self.client.cancel_order(symbol, order_id))
    }
}
