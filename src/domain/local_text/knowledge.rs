//! Fixed knowledge base used by the local generator.

pub struct Topic {
    pub key: &'static str,
    /// Extra spellings that resolve to this topic.
    pub aliases: &'static [&'static str],
    pub titles: &'static [&'static str],
    pub sentences: &'static [&'static str],
}

pub const GENERAL_KEY: &str = "geral";

pub static TOPICS: &[Topic] = &[
    Topic {
        key: "marketing digital",
        aliases: &["marketing", "redes sociais", "trafego pago", "tráfego pago"],
        titles: &[
            "Marketing Digital: Estratégias que Geram Resultados",
            "Como Atrair Clientes com Marketing Digital",
            "O Guia Prático do Marketing Digital para Pequenos Negócios",
            "Marketing Digital Sem Mistério",
        ],
        sentences: &[
            "Conhecer o público-alvo é o primeiro passo para qualquer campanha bem-sucedida.",
            "O conteúdo relevante pode transformar seguidores em clientes fiéis.",
            "As redes sociais permitem um contato direto e diário com a sua audiência.",
            "Investir em anúncios segmentados reduz o custo por aquisição de clientes.",
            "O e-mail marketing continua sendo um dos canais com melhor retorno sobre investimento.",
            "Métricas como taxa de conversão e engajamento mostram o que realmente funciona.",
            "Vídeos curtos são ótimos para capturar a atenção nos primeiros segundos.",
            "Uma boa estratégia de SEO pode trazer tráfego orgânico de forma consistente.",
            "Testes A/B ajudam a descobrir qual mensagem convence mais o seu público.",
            "A consistência na publicação é mais importante do que a quantidade de posts.",
            "Parcerias com criadores de conteúdo ampliam o alcance da sua marca.",
            "Um funil de vendas bem definido guia o cliente da descoberta até a compra.",
        ],
    },
    Topic {
        key: "finanças pessoais",
        aliases: &["financas pessoais", "finanças", "financas", "dinheiro", "investimentos"],
        titles: &[
            "Finanças Pessoais: O Caminho para a Liberdade Financeira",
            "Como Organizar o Seu Dinheiro em Poucos Passos",
            "Finanças Pessoais para Iniciantes",
            "Controle Financeiro Sem Complicação",
        ],
        sentences: &[
            "Montar um orçamento mensal é a base de uma vida financeira saudável.",
            "Uma reserva de emergência pode evitar dívidas em momentos inesperados.",
            "Anotar todos os gastos revela para onde o seu dinheiro realmente vai.",
            "Os juros compostos trabalham a favor de quem investe com regularidade.",
            "Evitar o cartão de crédito rotativo é essencial para não acumular dívidas.",
            "Diversificar investimentos reduz os riscos da sua carteira.",
            "Definir metas financeiras claras torna mais fácil manter a disciplina.",
            "Pequenas economias diárias se transformam em grandes valores ao longo do tempo.",
            "Renegociar dívidas com juros altos deve ser uma prioridade.",
            "Investir em educação financeira traz retorno para a vida toda.",
            "Separar as finanças pessoais das finanças do negócio evita confusões.",
            "Automatizar a poupança ajuda a guardar dinheiro antes de gastá-lo.",
        ],
    },
    Topic {
        key: "saúde e bem-estar",
        aliases: &["saude", "saúde", "bem-estar", "bem estar", "qualidade de vida"],
        titles: &[
            "Saúde e Bem-Estar no Dia a Dia",
            "Hábitos Simples para uma Vida Mais Saudável",
            "O Equilíbrio Entre Corpo e Mente",
            "Pequenas Mudanças, Grandes Resultados na Saúde",
        ],
        sentences: &[
            "Dormir bem é tão importante quanto se alimentar de forma equilibrada.",
            "A prática regular de atividade física melhora o humor e a disposição.",
            "Beber água ao longo do dia mantém o corpo funcionando corretamente.",
            "Pausas curtas durante o trabalho reduzem o estresse e aumentam a produtividade.",
            "Uma alimentação rica em vegetais fortalece o sistema imunológico.",
            "Cuidar da saúde mental é parte essencial do bem-estar.",
            "Caminhar trinta minutos por dia já traz benefícios significativos.",
            "Consultas médicas preventivas ajudam a identificar problemas cedo.",
            "Reduzir o consumo de açúcar melhora a energia ao longo do dia.",
            "Técnicas de respiração podem diminuir a ansiedade em poucos minutos.",
            "Manter relações sociais saudáveis contribui para a longevidade.",
        ],
    },
    Topic {
        key: "tecnologia",
        aliases: &["inteligência artificial", "inteligencia artificial", "software", "tech"],
        titles: &[
            "Tecnologia que Transforma Negócios",
            "As Tendências de Tecnologia que Você Precisa Conhecer",
            "Como a Tecnologia Está Mudando o Mercado",
            "Tecnologia Descomplicada",
        ],
        sentences: &[
            "A inteligência artificial já automatiza tarefas repetitivas em muitas empresas.",
            "A computação em nuvem reduz custos com infraestrutura própria.",
            "A segurança da informação deve fazer parte de todo projeto digital.",
            "Ferramentas de automação liberam tempo para atividades estratégicas.",
            "Dados bem analisados ajudam a tomar decisões mais rápidas e precisas.",
            "Aplicativos móveis aproximam as marcas do dia a dia dos clientes.",
            "A transformação digital é um processo contínuo e não um projeto isolado.",
            "Integrar sistemas evita retrabalho e erros de digitação.",
            "Novas tecnologias exigem capacitação constante das equipes.",
            "O atendimento por chatbots funciona vinte e quatro horas por dia.",
            "Soluções de código aberto podem acelerar o desenvolvimento de produtos.",
        ],
    },
    Topic {
        key: "empreendedorismo",
        aliases: &["empreender", "negócios", "negocios", "startup"],
        titles: &[
            "Empreendedorismo: Do Sonho à Realidade",
            "Os Primeiros Passos para Empreender",
            "Como Tirar a Sua Ideia do Papel",
            "Empreender com Estratégia",
        ],
        sentences: &[
            "Validar a ideia com clientes reais economiza tempo e dinheiro.",
            "Um plano de negócios simples já ajuda a enxergar riscos e oportunidades.",
            "Controlar o fluxo de caixa é vital para a sobrevivência da empresa.",
            "Começar pequeno permite aprender rápido e ajustar a rota.",
            "Ouvir o cliente é a melhor fonte de melhorias para o produto.",
            "Uma rede de contatos forte abre portas para parcerias e investimentos.",
            "Delegar tarefas é necessário para que o negócio possa crescer.",
            "Errar faz parte do processo, desde que se aprenda com cada erro.",
            "Diferenciais claros tornam a sua empresa lembrada pelo público.",
            "Formalizar o negócio traz segurança jurídica e acesso a crédito.",
            "Acompanhar indicadores mostra se a empresa está no caminho certo.",
        ],
    },
    Topic {
        key: GENERAL_KEY,
        aliases: &[],
        titles: &[
            "Tudo o que Você Precisa Saber",
            "Um Guia Rápido e Prático",
            "Dicas Essenciais para o Seu Dia a Dia",
            "Aprenda Algo Novo Hoje",
        ],
        sentences: &[
            "Planejamento é o ponto de partida para qualquer conquista.",
            "Pequenos passos diários levam a grandes resultados.",
            "Buscar informação de qualidade faz toda a diferença.",
            "A prática constante transforma conhecimento em habilidade.",
            "Definir prioridades ajuda a usar melhor o tempo disponível.",
            "Aprender com quem já trilhou o caminho acelera a jornada.",
            "Manter a curiosidade abre espaço para novas oportunidades.",
            "Organização reduz o estresse e aumenta a produtividade.",
            "Compartilhar conhecimento fortalece comunidades inteiras.",
            "Revisar os resultados periodicamente permite corrigir a rota.",
        ],
    },
];

/// Opening phrases; `{tema}` is replaced with the requested theme.
pub static INTRO_PHRASES: &[&str] = &[
    "Neste vídeo, vamos falar sobre {tema}.",
    "Você já parou para pensar em {tema}?",
    "Hoje o assunto é {tema}.",
    "Se você quer entender {tema}, fique até o final.",
];

pub static TRANSITIONS: &[&str] = &[
    "Além disso,",
    "Outro ponto importante:",
    "Vale lembrar que",
    "Na prática,",
    "Por outro lado,",
    "Também é importante destacar que",
];

pub static CONCLUSIONS: &[&str] = &[
    "Para concluir,",
    "Em resumo,",
    "Por fim,",
    "Resumindo tudo,",
];

/// Resolve the topic for a theme and free-text prompt.
pub fn resolve(theme: &str, prompt: &str) -> &'static Topic {
    let haystack = format!("{} {}", theme, prompt).to_lowercase();
    TOPICS
        .iter()
        .filter(|topic| topic.key != GENERAL_KEY)
        .find(|topic| {
            haystack.contains(topic.key) || topic.aliases.iter().any(|a| haystack.contains(a))
        })
        .unwrap_or_else(general)
}

pub fn general() -> &'static Topic {
    TOPICS
        .iter()
        .find(|topic| topic.key == GENERAL_KEY)
        .unwrap_or(&TOPICS[TOPICS.len() - 1])
}
